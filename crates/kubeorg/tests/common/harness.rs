//! Test harness for isolated organizer runs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use kubeorg::{Catalog, CatalogSource, Organizer, OrganizerConfig};

pub fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Temp directory holding a `source/` tree and an `out/` destination.
pub struct TestHarness {
    temp_dir: TempDir,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source_dir = temp_dir.path().join("source");
        let dest_dir = temp_dir.path().join("out");
        std::fs::create_dir_all(&source_dir).expect("Failed to create source dir");

        Self {
            temp_dir,
            source_dir,
            dest_dir,
        }
    }

    /// A harness whose source tree is a copy of `tests/fixtures/manifests`.
    pub fn with_fixture_tree() -> Self {
        let harness = Self::new();
        copy_tree(&fixtures_path().join("manifests"), &harness.source_dir);
        harness
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn catalog_path(&self) -> PathBuf {
        fixtures_path().join("resources.json")
    }

    pub fn catalog(&self) -> Catalog {
        CatalogSource::File(self.catalog_path())
            .load()
            .expect("Failed to load fixture catalog")
    }

    /// Default config: fixture catalog, destination `out/`.
    pub fn config(&self) -> OrganizerConfig {
        OrganizerConfig::new(&self.dest_dir)
            .with_catalog_source(CatalogSource::File(self.catalog_path()))
    }

    pub fn organizer(&self) -> Organizer {
        self.organizer_with(self.config())
    }

    pub fn organizer_with(&self, config: OrganizerConfig) -> Organizer {
        Organizer::from_config(config).expect("Failed to build organizer")
    }

    pub fn write_source(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.source_dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).expect("Failed to create source subdir");
        std::fs::write(&path, content).expect("Failed to write source file");
        path
    }

    pub fn dest(&self, relative: &str) -> PathBuf {
        self.dest_dir.join(relative)
    }

    pub fn read_dest(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dest(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn read_dest_yaml(&self, relative: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read_dest(relative)).expect("Written file is not valid YAML")
    }

    /// Every file below `out/`, relative, sorted.
    pub fn dest_files(&self) -> Vec<String> {
        list_files(&self.dest_dir)
    }

    /// Relative path and content of every file below `out/`.
    pub fn dest_snapshot(&self) -> Vec<(String, Vec<u8>)> {
        self.dest_files()
            .into_iter()
            .map(|f| {
                let content = std::fs::read(self.dest(&f)).expect("Failed to read output");
                (f, content)
            })
            .collect()
    }
}

pub fn list_files(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

fn copy_tree(from: &Path, to: &Path) {
    for entry in WalkDir::new(from).into_iter().filter_map(|e| e.ok()) {
        let relative = entry.path().strip_prefix(from).unwrap();
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).expect("Failed to create fixture dir");
        } else {
            std::fs::copy(entry.path(), &target).expect("Failed to copy fixture");
        }
    }
}
