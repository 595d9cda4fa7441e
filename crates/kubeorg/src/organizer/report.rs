use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::OrganizeError;

/// What happened to one document (or, with `document: None`, to a whole
/// source that could not be read).
#[derive(Debug)]
pub struct OrganizeOutcome {
    pub source: String,
    pub document: Option<usize>,
    pub result: Result<PathBuf, OrganizeError>,
}

impl OrganizeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn target(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(PathBuf::as_path)
    }

    pub fn error(&self) -> Option<&OrganizeError> {
        self.result.as_ref().err()
    }
}

impl fmt::Display for OrganizeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.document {
            Some(index) => write!(f, "{}.{}", self.source, index),
            None => write!(f, "{}", self.source),
        }
    }
}

/// Ordered outcomes of a run.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<OrganizeOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: OrganizeOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn record_source_failure(&mut self, source: impl Into<String>, error: OrganizeError) {
        self.outcomes.push(OrganizeOutcome {
            source: source.into(),
            document: None,
            result: Err(error),
        });
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn outcomes(&self) -> &[OrganizeOutcome] {
        &self.outcomes
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(OrganizeOutcome::target)
    }

    pub fn failures(&self) -> impl Iterator<Item = &OrganizeOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn written_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.written_count()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
