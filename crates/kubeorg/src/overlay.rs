//! Per-directory `kustomization.yaml` generation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::error::{OrganizeError, StorageError};
use crate::manifest::YamlWriter;

pub const KUSTOMIZE_API_VERSION: &str = "kustomize.config.k8s.io/v1beta1";
pub const KUSTOMIZE_KIND: &str = "Kustomization";
pub const KUSTOMIZATION_FILE: &str = "kustomization.yaml";

/// Keeps the list of organized files per destination directory for the
/// length of one run and rewrites the directory's overlay after each
/// addition, so no earlier entry is lost when several manifests land in the
/// same directory.
#[derive(Debug, Default)]
pub struct OverlayManager {
    writer: YamlWriter,
    resources: HashMap<PathBuf, Vec<String>>,
}

impl OverlayManager {
    pub fn new(writer: YamlWriter) -> Self {
        Self {
            writer,
            resources: HashMap::new(),
        }
    }

    /// Adds `target` to its directory's overlay and writes the overlay.
    ///
    /// `template` supplies extra keys (namespace, labels, ...); its
    /// `apiVersion`, `kind` and `resources` are always replaced.
    pub fn record(
        &mut self,
        target: &Path,
        template: Option<&Mapping>,
    ) -> Result<PathBuf, OrganizeError> {
        let (dir, file_name) = split_target(target)?;

        let entries = self.resources.entry(dir.to_path_buf()).or_default();
        if !entries.iter().any(|e| e == &file_name) {
            entries.push(file_name);
        }

        let descriptor = build_descriptor(template, entries);
        let overlay_path = dir.join(KUSTOMIZATION_FILE);
        let content = self.writer.to_string(&descriptor)?;

        info!("Writing kustomization to {}", overlay_path.display());
        std::fs::write(&overlay_path, content).map_err(|e| StorageError::WriteFile {
            path: overlay_path.clone(),
            source: e,
        })?;

        Ok(overlay_path)
    }

    /// Files recorded so far for `dir`, in the order they were organized.
    pub fn resources(&self, dir: &Path) -> &[String] {
        self.resources.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn split_target(target: &Path) -> Result<(&Path, String), OrganizeError> {
    let dir = target.parent();
    let file_name = target.file_name().and_then(|n| n.to_str());

    match (dir, file_name) {
        (Some(dir), Some(name)) => Ok((dir, name.to_string())),
        _ => Err(OrganizeError::InvalidName(target.display().to_string())),
    }
}

/// Merges the fixed overlay keys over `template`.
pub fn build_descriptor(template: Option<&Mapping>, resources: &[String]) -> Mapping {
    let mut descriptor = template.cloned().unwrap_or_default();

    descriptor.insert("apiVersion".into(), KUSTOMIZE_API_VERSION.into());
    descriptor.insert("kind".into(), KUSTOMIZE_KIND.into());
    descriptor.insert(
        "resources".into(),
        Value::Sequence(resources.iter().map(|r| Value::from(r.as_str())).collect()),
    );

    descriptor
}
