//! Feeding manifests from disk (or stdin) into an [`Organizer`].

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_yaml::Mapping;
use walkdir::WalkDir;

use crate::error::{KubeorgError, OrganizeError, StorageError};
use crate::manifest::{parse_documents, parse_overlay_template, Document};
use crate::organizer::{is_same_file, BatchReport, Organizer};
use crate::overlay::KUSTOMIZATION_FILE;

pub const STDIN_LABEL: &str = "<stdin>";

/// How much of the source tree to remove while organizing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum CleanLevel {
    /// Leave the source tree alone.
    #[default]
    Keep,
    /// Remove existing `kustomization.yaml` files.
    Overlays,
    /// Also remove every source manifest whose documents were all organized.
    All,
}

impl CleanLevel {
    /// Maps a repeated `-k` flag count to a level.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => CleanLevel::Keep,
            1 => CleanLevel::Overlays,
            _ => CleanLevel::All,
        }
    }
}

/// A manifest file discovered in a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn label(&self) -> String {
        self.path.display().to_string()
    }

    pub fn read_documents(&self) -> Result<Vec<Document>, OrganizeError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| OrganizeError::ReadFile {
                path: self.path.clone(),
                source: e,
            })?;
        parse_documents(&content, &self.path)
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Result of walking a source tree.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Manifest files, sorted by path.
    pub sources: Vec<SourceFile>,
    /// Existing overlay descriptors, sorted by path.
    pub overlays: Vec<PathBuf>,
}

pub struct ManifestScanner {
    source_root: PathBuf,
    clean: CleanLevel,
    preserve: bool,
}

impl ManifestScanner {
    pub fn new<P: AsRef<Path>>(source_root: P) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            clean: CleanLevel::Keep,
            preserve: false,
        }
    }

    pub fn with_clean(mut self, clean: CleanLevel) -> Self {
        self.clean = clean;
        self
    }

    /// Copy single-document files verbatim instead of re-serializing them.
    pub fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve = preserve;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn scan(&self) -> Result<ScanResult, KubeorgError> {
        let mut result = ScanResult::default();

        for entry in WalkDir::new(&self.source_root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(KubeorgError::Scan {
                        path: self.source_root.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            if path.file_name().and_then(|n| n.to_str()) == Some(KUSTOMIZATION_FILE) {
                result.overlays.push(path.to_path_buf());
                continue;
            }

            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => {
                    debug!("Found manifest: {}", path.display());
                    result.sources.push(SourceFile::new(path));
                }
                _ => {}
            }
        }

        info!(
            "Scanned {} manifests and {} overlays in {}",
            result.sources.len(),
            result.overlays.len(),
            self.source_root.display()
        );
        Ok(result)
    }

    /// Organizes the whole source tree.
    ///
    /// Each source directory's existing `kustomization.yaml` becomes the
    /// template for overlays generated from manifests in that directory.
    /// Templates are read before any cleaning happens.
    pub fn organize_tree(&self, organizer: &mut Organizer) -> Result<BatchReport, KubeorgError> {
        let scan = self.scan()?;
        let dry_run = organizer.config().dry_run;

        let templates = load_templates(&scan.overlays);

        if self.clean >= CleanLevel::Overlays {
            for overlay in &scan.overlays {
                clean_up(overlay, dry_run)?;
            }
        }

        let mut report = BatchReport::new();
        for source in &scan.sources {
            let template = templates.get(source.directory());
            let source_report = self.organize_source(organizer, source, template)?;

            if self.clean >= CleanLevel::All && can_remove(source, &source_report) {
                clean_up(&source.path, dry_run)?;
            }

            report.merge(source_report);
        }

        Ok(report)
    }

    fn organize_source(
        &self,
        organizer: &mut Organizer,
        source: &SourceFile,
        template: Option<&Mapping>,
    ) -> Result<BatchReport, KubeorgError> {
        let label = source.label();

        let docs = match source.read_documents() {
            Ok(docs) => docs,
            Err(e) => {
                warn!("{}: skipped: {}", label, e);
                let mut report = BatchReport::new();
                report.record_source_failure(label, e);
                return Ok(report);
            }
        };

        if self.preserve {
            let mut present = docs.iter().enumerate().filter(|(_, d)| !d.is_null());
            if let (Some((index, doc)), None) = (present.next(), present.next()) {
                let mut report = BatchReport::new();
                let result = organizer.organize_path(&source.path, doc, template);
                organizer.record(&mut report, &label, index, result)?;
                return Ok(report);
            }
            debug!("{}: several documents, re-serializing", label);
        }

        organizer.organize_many(docs, &label, template)
    }
}

/// Organizes explicitly named files, without overlay templates.
pub fn organize_files<P: AsRef<Path>>(
    organizer: &mut Organizer,
    paths: &[P],
) -> Result<BatchReport, KubeorgError> {
    let mut report = BatchReport::new();

    for path in paths {
        let source = SourceFile::new(path.as_ref());
        match source.read_documents() {
            Ok(docs) => report.merge(organizer.organize_many(docs, &source.label(), None)?),
            Err(e) => {
                warn!("{}: skipped: {}", source.label(), e);
                report.record_source_failure(source.label(), e);
            }
        }
    }

    Ok(report)
}

/// Organizes a YAML stream, typically stdin.
pub fn organize_reader<R: Read>(
    organizer: &mut Organizer,
    mut reader: R,
    label: &str,
) -> Result<BatchReport, KubeorgError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(KubeorgError::Stdin)?;

    match parse_documents(&content, Path::new(label)) {
        Ok(docs) => organizer.organize_many(docs, label, None),
        Err(e) => {
            warn!("{}: skipped: {}", label, e);
            let mut report = BatchReport::new();
            report.record_source_failure(label, e);
            Ok(report)
        }
    }
}

fn load_templates(overlays: &[PathBuf]) -> HashMap<PathBuf, Mapping> {
    let mut templates = HashMap::new();

    for path in overlays {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| parse_overlay_template(&content, path).map_err(|e| e.to_string()));

        match (parsed, path.parent()) {
            (Ok(template), Some(dir)) => {
                templates.insert(dir.to_path_buf(), template);
            }
            (Err(e), _) => warn!("Ignoring overlay template {}: {}", path.display(), e),
            (Ok(_), None) => {}
        }
    }

    templates
}

/// A source may go once everything in it was organized, unless it was
/// organized onto itself.
fn can_remove(source: &SourceFile, report: &BatchReport) -> bool {
    !report.has_failures()
        && report
            .written()
            .all(|target| target != source.path && !is_same_file(target, &source.path))
}

/// Removes a file during cleaning. Only fatal storage errors end the run;
/// anything else (typically a file that is already gone) is logged.
fn clean_up(path: &Path, dry_run: bool) -> Result<(), KubeorgError> {
    match remove_file(path, dry_run) {
        Err(e) if e.is_fatal() => Err(KubeorgError::Storage(e)),
        Err(e) => {
            warn!("Not removed: {}", e);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

fn remove_file(path: &Path, dry_run: bool) -> Result<(), StorageError> {
    info!("Removing {}", path.display());
    if dry_run {
        return Ok(());
    }

    std::fs::remove_file(path).map_err(|e| StorageError::RemoveFile {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_clean_level_from_count() {
        assert_eq!(CleanLevel::from_count(0), CleanLevel::Keep);
        assert_eq!(CleanLevel::from_count(1), CleanLevel::Overlays);
        assert_eq!(CleanLevel::from_count(2), CleanLevel::All);
        assert_eq!(CleanLevel::from_count(7), CleanLevel::All);
        assert!(CleanLevel::All > CleanLevel::Overlays);
    }

    #[test]
    fn test_scan_finds_manifests_and_overlays() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "b/service.yaml", "kind: Service\n");
        write(root, "a/deploy.yml", "kind: Deployment\n");
        write(root, "a/kustomization.yaml", "resources: []\n");
        write(root, "README.md", "# docs\n");

        let scan = ManifestScanner::new(root).scan().unwrap();

        assert_eq!(
            scan.sources,
            vec![
                SourceFile::new(root.join("a/deploy.yml")),
                SourceFile::new(root.join("b/service.yaml")),
            ]
        );
        assert_eq!(scan.overlays, vec![root.join("a/kustomization.yaml")]);
    }

    #[test]
    fn test_scan_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ManifestScanner::new(temp_dir.path().join("missing")).scan();

        assert!(matches!(result, Err(KubeorgError::Scan { .. })));
    }

    #[test]
    fn test_load_templates_skips_invalid_overlays() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let good = write(root, "good/kustomization.yaml", "namespace: prod\n");
        let bad = write(root, "bad/kustomization.yaml", "- not\n- a mapping\n");

        let templates = load_templates(&[good, bad]);

        assert_eq!(templates.len(), 1);
        assert!(templates.contains_key(&root.join("good")));
    }

    #[test]
    fn test_read_documents_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "broken.yaml", "a: [1, 2\n");

        assert!(matches!(
            SourceFile::new(&path).read_documents(),
            Err(OrganizeError::ParseYaml { .. })
        ));
    }

    #[test]
    fn test_clean_up_ignores_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.yaml");

        assert!(matches!(
            remove_file(&missing, false),
            Err(StorageError::RemoveFile { .. })
        ));
        assert!(clean_up(&missing, false).is_ok());
    }

    #[test]
    fn test_can_remove_compares_canonical_paths() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "tree/ns.yaml", "kind: Namespace\n");
        let aliased = temp_dir.path().join("tree/../tree/./ns.yaml");
        let other = write(temp_dir.path(), "tree/other.yaml", "kind: Namespace\n");

        let report_for = |target: PathBuf| {
            let mut report = BatchReport::new();
            report.push(crate::organizer::OrganizeOutcome {
                source: "ns.yaml".to_string(),
                document: Some(0),
                result: Ok(target),
            });
            report
        };

        let source = SourceFile::new(&path);
        assert!(!can_remove(&source, &report_for(aliased)));
        assert!(!can_remove(&source, &report_for(path.clone())));
        assert!(can_remove(&source, &report_for(other)));
    }

    #[test]
    fn test_read_documents_missing_file() {
        assert!(matches!(
            SourceFile::new("/nonexistent/x.yaml").read_documents(),
            Err(OrganizeError::ReadFile { .. })
        ));
    }
}
