//! Shared import pipeline entrypoint used by the CLI.
//!
//! resolve -> plan -> present -> confirm -> apply. Every stage fails fast and
//! nothing is written to the destination before the plan has been shown.

use std::io::Write;

use orbport_core::{DestinationRegistry, SourceRegistry};

use crate::apply::{apply_plan, ApplySummary};
use crate::error::ImportError;
use crate::plan::{generate_import_plan, ImportPlan};
use crate::present::display_plan;
use crate::resolve::{parse_references, versions_to_import};

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The plan had no actions; nothing was asked or written.
    NothingToDo,
    /// The plan was shown but `dry_run` was set.
    DryRun,
    /// The confirmation callback said no.
    Declined,
    Applied(ApplySummary),
}

/// Resolve `references` against `source` and diff them against `destination`.
///
/// Read-only on both registries.
pub fn plan<S, D, R>(source: &S, destination: &D, references: &[R]) -> Result<ImportPlan, ImportError>
where
    S: SourceRegistry + ?Sized,
    D: DestinationRegistry + ?Sized,
    R: AsRef<str>,
{
    let references = parse_references(references)?;
    let versions = versions_to_import(source, &references)?;
    tracing::debug!(
        references = references.len(),
        versions = versions.len(),
        "resolved references"
    );
    generate_import_plan(destination, &versions)
}

/// Run the whole import.
///
/// The plan is written to `out` before anything else happens. `confirm` is
/// only consulted when there is something to do and `dry_run` is off.
pub fn run<S, D, R, W, F>(
    source: &S,
    destination: &D,
    references: &[R],
    dry_run: bool,
    out: &mut W,
    confirm: F,
) -> Result<ImportOutcome, ImportError>
where
    S: SourceRegistry + ?Sized,
    D: DestinationRegistry + ?Sized,
    R: AsRef<str>,
    W: Write + ?Sized,
    F: FnOnce(&ImportPlan) -> bool,
{
    let plan = plan(source, destination, references)?;
    display_plan(out, &plan)?;

    if plan.is_empty() {
        return Ok(ImportOutcome::NothingToDo);
    }
    if dry_run {
        return Ok(ImportOutcome::DryRun);
    }
    if !confirm(&plan) {
        tracing::info!(actions = plan.action_count(), "import declined");
        return Ok(ImportOutcome::Declined);
    }

    apply_plan(destination, &plan).map(ImportOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbport_testkit::{orb_version, MemoryRegistry};

    fn source() -> MemoryRegistry {
        let source = MemoryRegistry::new();
        source.publish(orb_version("acme/build-tools", "1.2.0"));
        source
    }

    #[test]
    fn run_applies_after_confirmation() {
        let (source, dest) = (source(), MemoryRegistry::new());
        let mut out = Vec::new();
        let mut asked = false;

        let outcome = run(&source, &dest, &["acme/build-tools@1.2.0"], false, &mut out, |plan| {
            asked = true;
            plan.action_count() == 3
        })
        .expect("run");

        assert!(asked);
        assert_eq!(
            outcome,
            ImportOutcome::Applied(ApplySummary {
                namespaces: 1,
                orbs: 1,
                versions: 1
            })
        );
        assert!(String::from_utf8(out)
            .expect("utf8")
            .starts_with("The following actions will be performed:\n"));
        assert!(dest.has_version(&"acme/build-tools@1.2.0".parse().expect("ref")));
    }

    #[test]
    fn declined_run_writes_nothing() {
        let (source, dest) = (source(), MemoryRegistry::new());
        let outcome = run(&source, &dest, &["acme/build-tools@1.2.0"], false, &mut Vec::new(), |_| false)
            .expect("run");
        assert_eq!(outcome, ImportOutcome::Declined);
        assert!(dest.mutations().is_empty());
    }

    #[test]
    fn dry_run_never_asks() {
        let (source, dest) = (source(), MemoryRegistry::new());
        let outcome = run(&source, &dest, &["acme/build-tools@1.2.0"], true, &mut Vec::new(), |_| {
            panic!("confirm must not be called on a dry run")
        })
        .expect("run");
        assert_eq!(outcome, ImportOutcome::DryRun);
        assert!(dest.mutations().is_empty());
    }

    #[test]
    fn nothing_to_do_skips_confirmation() {
        let source = source();
        let dest = MemoryRegistry::new();
        dest.publish(orb_version("acme/build-tools", "1.2.0"));
        let mut out = Vec::new();

        let outcome = run(&source, &dest, &["acme/build-tools@1.2.0"], false, &mut out, |_| {
            panic!("nothing to confirm")
        })
        .expect("run");
        assert_eq!(outcome, ImportOutcome::NothingToDo);
        assert!(String::from_utf8(out).expect("utf8").ends_with("Nothing to do!\n"));
    }

    #[test]
    fn resolution_failure_prints_nothing() {
        let (source, dest) = (source(), MemoryRegistry::new());
        let mut out = Vec::new();
        let err = run(&source, &dest, &["acme/missing@1.0.0"], false, &mut out, |_| true).unwrap_err();
        assert!(matches!(err, ImportError::OrbVersionNotFound { .. }));
        assert!(out.is_empty());
        assert!(dest.calls().is_empty());
    }
}
