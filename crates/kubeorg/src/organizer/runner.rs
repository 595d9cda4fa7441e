use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use tracing::{debug, info, info_span, warn};

use crate::catalog::Catalog;
use crate::classifier::Classifier;
use crate::config::OrganizerConfig;
use crate::error::{CatalogError, KubeorgError, OrganizeError, StorageError};
use crate::manifest::{Document, ManifestHeader};
use crate::overlay::OverlayManager;
use crate::resolver;

use super::report::{BatchReport, OrganizeOutcome};

pub struct Organizer {
    config: OrganizerConfig,
    catalog: Catalog,
    classifier: Classifier,
    overlays: OverlayManager,
}

impl Organizer {
    pub fn new(config: OrganizerConfig, catalog: Catalog) -> Self {
        let classifier = Classifier::new(&config.skip_patterns, config.warn_on_namespaced);
        let overlays = OverlayManager::new(config.writer.clone());

        Self {
            config,
            catalog,
            classifier,
            overlays,
        }
    }

    /// Loads the catalog named by the config and builds an organizer on it.
    pub fn from_config(config: OrganizerConfig) -> Result<Self, CatalogError> {
        let catalog = config.catalog_source.load()?;
        info!(
            "Loaded {} resource types from {}",
            catalog.len(),
            config.catalog_source
        );
        Ok(Self::new(config, catalog))
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    /// Classifies `doc` and computes where it belongs.
    pub fn target_for(&self, doc: &Document) -> Result<PathBuf, OrganizeError> {
        let descriptor = self.classifier.classify(doc, &self.catalog)?;
        let header = ManifestHeader::from_document(doc)?;
        resolver::resolve(&header, descriptor, &self.config.dest_root)
    }

    /// Serializes `doc` to its target.
    pub fn organize_doc(
        &mut self,
        doc: &Document,
        template: Option<&Mapping>,
    ) -> Result<PathBuf, OrganizeError> {
        let target = self.prepare_target(doc)?;
        if self.config.dry_run {
            info!("Would write resource to {}", target.display());
            return Ok(target);
        }

        let content = self.config.writer.to_string(doc)?;
        info!("Writing resource to {}", target.display());
        std::fs::write(&target, content).map_err(|e| StorageError::WriteFile {
            path: target.clone(),
            source: e,
        })?;

        self.finish(&target, template)?;
        Ok(target)
    }

    /// Copies the file at `path` verbatim to the target computed for `doc`,
    /// keeping its comments and formatting.
    pub fn organize_path(
        &mut self,
        path: &Path,
        doc: &Document,
        template: Option<&Mapping>,
    ) -> Result<PathBuf, OrganizeError> {
        let target = self.prepare_target(doc)?;
        if self.config.dry_run {
            info!("Would copy {} to {}", path.display(), target.display());
            return Ok(target);
        }

        if is_same_file(path, &target) {
            debug!("{} is already in place", target.display());
        } else {
            info!("Copying {} to {}", path.display(), target.display());
            std::fs::copy(path, &target).map_err(|e| StorageError::CopyFile {
                from: path.to_path_buf(),
                to: target.clone(),
                source: e,
            })?;
        }

        self.finish(&target, template)?;
        Ok(target)
    }

    /// Organizes every document in input order.
    ///
    /// A document that cannot be organized is logged, recorded in the report
    /// and skipped. Only storage failures that make further writes pointless
    /// end the run early.
    pub fn organize_many<I>(
        &mut self,
        docs: I,
        source: &str,
        template: Option<&Mapping>,
    ) -> Result<BatchReport, KubeorgError>
    where
        I: IntoIterator<Item = Document>,
    {
        let _span = info_span!("organize", source = %source).entered();
        let mut report = BatchReport::new();

        for (index, doc) in docs.into_iter().enumerate() {
            if doc.is_null() {
                debug!("{}.{}: empty document", source, index);
                continue;
            }

            let result = self.organize_doc(&doc, template);
            self.record(&mut report, source, index, result)?;
        }

        Ok(report)
    }

    /// Logs and records one outcome, turning fatal storage errors into an
    /// early return.
    pub(crate) fn record(
        &self,
        report: &mut BatchReport,
        source: &str,
        index: usize,
        result: Result<PathBuf, OrganizeError>,
    ) -> Result<(), KubeorgError> {
        let result = match result {
            Err(OrganizeError::Storage(e)) if e.is_fatal() => {
                return Err(KubeorgError::Storage(e));
            }
            Err(e) => {
                warn!("{}.{}: skipped: {}", source, index, e);
                Err(e)
            }
            Ok(target) => Ok(target),
        };

        report.push(OrganizeOutcome {
            source: source.to_string(),
            document: Some(index),
            result,
        });
        Ok(())
    }

    /// Resolves the target and makes sure it may be written.
    fn prepare_target(&self, doc: &Document) -> Result<PathBuf, OrganizeError> {
        let target = self.target_for(doc)?;

        // symlink_metadata also catches dangling symlinks
        if std::fs::symlink_metadata(&target).is_ok() && !self.config.force {
            return Err(OrganizeError::AlreadyExists(target));
        }

        if !self.config.dry_run {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        Ok(target)
    }

    fn finish(&mut self, target: &Path, template: Option<&Mapping>) -> Result<(), OrganizeError> {
        if self.config.overlay_enabled {
            self.overlays.record(target, template)?;
        }
        Ok(())
    }
}

/// Copying a file onto itself would truncate it, which happens when a tree
/// is reorganized in place with `force`. Compares canonical paths, so
/// `manifests`, `./manifests` and `src/../manifests` are all the same tree.
pub(crate) fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
