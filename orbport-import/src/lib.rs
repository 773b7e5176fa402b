//! # orbport-import
//!
//! Copy orbs between registries.
//!
//! Call [`pipeline::run`] to resolve references against a source registry,
//! show the resulting [`ImportPlan`], and apply it to a destination. The
//! individual stages ([`versions_to_import`], [`generate_import_plan`],
//! [`display_plan`], [`apply_plan`]) are public for callers that need to
//! drive them separately.

pub mod apply;
pub mod dedupe;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod present;
pub mod resolve;

pub use apply::{apply_plan, ApplySummary};
pub use error::ImportError;
pub use pipeline::ImportOutcome;
pub use plan::{generate_import_plan, ImportPlan};
pub use present::{display_plan, render_plan};
pub use resolve::{parse_references, versions_to_import};
