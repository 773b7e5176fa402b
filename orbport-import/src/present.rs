//! Human-readable rendering of an [`ImportPlan`].

use std::io::{self, Write};

use crate::plan::ImportPlan;

/// Render `plan` as text.
///
/// With no actions to perform the action header is omitted and the text ends
/// in `Nothing to do!`; already-existing versions are still listed.
pub fn render_plan(plan: &ImportPlan) -> String {
    let mut out = String::new();

    if !plan.is_empty() {
        out.push_str("The following actions will be performed:\n");
        for ns in &plan.new_namespaces {
            out.push_str(&format!("  Create namespace '{ns}'\n"));
        }
        for orb in &plan.new_orbs {
            out.push_str(&format!("  Create orb '{}'\n", orb.name));
        }
        for v in &plan.new_versions {
            out.push_str(&format!("  Import version '{}'\n", v.reference()));
        }
    }

    if !plan.already_existing_versions.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("The following orb versions already exist:\n");
        for v in &plan.already_existing_versions {
            out.push_str(&format!("  ('{}')\n", v.reference()));
        }
    }

    if plan.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Nothing to do!\n");
    } else {
        out.push('\n');
    }
    out
}

/// Write the rendered plan to `w`.
pub fn display_plan<W: Write + ?Sized>(w: &mut W, plan: &ImportPlan) -> io::Result<()> {
    w.write_all(render_plan(plan).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbport_core::{NamespaceName, Orb, OrbName};
    use orbport_testkit::orb_version;

    #[test]
    fn prints_every_section() {
        let plan = ImportPlan {
            new_namespaces: vec![NamespaceName::from("namespace1")],
            new_orbs: vec![Orb::named(OrbName::from("namespace1/orb"))],
            new_versions: vec![
                orb_version("namespace1/orb", "0.0.1"),
                orb_version("namespace1/orb", "0.0.2"),
            ],
            already_existing_versions: vec![orb_version("namespace1/orb", "0.0.3")],
        };

        let mut buf = Vec::new();
        display_plan(&mut buf, &plan).expect("write");
        let expected = "The following actions will be performed:
  Create namespace 'namespace1'
  Create orb 'namespace1/orb'
  Import version 'namespace1/orb@0.0.1'
  Import version 'namespace1/orb@0.0.2'

The following orb versions already exist:
  ('namespace1/orb@0.0.3')

";
        assert_eq!(String::from_utf8(buf).expect("utf8"), expected);
    }

    #[test]
    fn only_existing_versions_is_nothing_to_do() {
        let plan = ImportPlan {
            already_existing_versions: vec![orb_version("acme/build-tools", "1.2.0")],
            ..ImportPlan::default()
        };
        assert_eq!(
            render_plan(&plan),
            "The following orb versions already exist:\n  ('acme/build-tools@1.2.0')\n\nNothing to do!\n"
        );
    }

    #[test]
    fn empty_plan_is_a_single_line() {
        assert_eq!(render_plan(&ImportPlan::default()), "Nothing to do!\n");
    }
}
