use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSource;
use crate::manifest::YamlWriter;

/// Everything an [`Organizer`](crate::Organizer) needs to know about a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerConfig {
    /// Where the resource catalog comes from.
    #[serde(default)]
    pub catalog_source: CatalogSource,

    /// Root of the organized tree.
    pub dest_root: PathBuf,

    /// Write a `kustomization.yaml` next to every organized manifest.
    #[serde(default = "default_true")]
    pub overlay_enabled: bool,

    /// Overwrite existing targets.
    #[serde(default)]
    pub force: bool,

    /// Log a warning for every namespaced resource organized.
    #[serde(default)]
    pub warn_on_namespaced: bool,

    /// Compute and report targets without touching the filesystem.
    #[serde(default)]
    pub dry_run: bool,

    /// Additional `group/kind` glob patterns to leave alone.
    #[serde(default)]
    pub skip_patterns: Vec<String>,

    #[serde(default)]
    pub writer: YamlWriter,
}

fn default_true() -> bool {
    true
}

impl OrganizerConfig {
    pub fn new(dest_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog_source: CatalogSource::default(),
            dest_root: dest_root.into(),
            overlay_enabled: true,
            force: false,
            warn_on_namespaced: false,
            dry_run: false,
            skip_patterns: Vec::new(),
            writer: YamlWriter::default(),
        }
    }

    pub fn with_catalog_source(mut self, source: CatalogSource) -> Self {
        self.catalog_source = source;
        self
    }

    pub fn with_overlays(mut self, enabled: bool) -> Self {
        self.overlay_enabled = enabled;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_warn_on_namespaced(mut self, warn: bool) -> Self {
        self.warn_on_namespaced = warn;
        self
    }

    pub fn with_skip_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.skip_patterns.push(pattern.into());
        self
    }

    pub fn with_writer(mut self, writer: YamlWriter) -> Self {
        self.writer = writer;
        self
    }
}
