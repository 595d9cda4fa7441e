//! Batch organization of manifests.
//!
//! The [`Organizer`] runs classification, path resolution, writing and
//! overlay generation for each document it is handed, and collects the
//! per-document results in a [`BatchReport`].

pub mod report;
pub mod runner;

pub use report::{BatchReport, OrganizeOutcome};
pub use runner::Organizer;
pub(crate) use runner::is_same_file;
