//! Maps a manifest to the resource type it instantiates.

use glob::{MatchOptions, Pattern};
use tracing::warn;

use crate::catalog::{resource_key, Catalog, ResourceDescriptor, CORE_GROUP};
use crate::error::OrganizeError;
use crate::manifest::{Document, ManifestHeader};

/// Group/kind patterns that are never organized. Overlay descriptors are
/// outputs of this tool, not resources.
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &["kustomize.config.k8s.io/*"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Returns the API group of a manifest: the part of `apiVersion` before the
/// first `/`, or `core` for unqualified versions like `v1`.
pub fn group_of(doc: &Document) -> Result<String, OrganizeError> {
    let header = ManifestHeader::from_document(doc)?;
    Ok(api_group(header.api_version).to_string())
}

fn api_group(api_version: &str) -> &str {
    match api_version.split_once('/') {
        Some((group, _version)) => group,
        None => CORE_GROUP,
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    skip_patterns: Vec<Pattern>,
    warn_on_namespaced: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        let skip_patterns = DEFAULT_SKIP_PATTERNS
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();

        Self {
            skip_patterns,
            warn_on_namespaced: false,
        }
    }
}

impl Classifier {
    /// Creates a classifier with the default skip patterns plus `extra`.
    /// Patterns that fail to compile are logged and ignored.
    pub fn new<I, S>(extra: I, warn_on_namespaced: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classifier = Self::default();
        classifier.warn_on_namespaced = warn_on_namespaced;

        for p in extra {
            let p = p.as_ref();
            match Pattern::new(p) {
                Ok(pattern) => classifier.skip_patterns.push(pattern),
                Err(e) => warn!("Invalid skip pattern '{}': {}", p, e),
            }
        }

        classifier
    }

    pub fn is_skipped(&self, key: &str) -> bool {
        self.skip_patterns
            .iter()
            .any(|p| p.matches_with(key, MATCH_OPTIONS))
    }

    /// Finds the catalog entry describing `doc`.
    pub fn classify<'c>(
        &self,
        doc: &Document,
        catalog: &'c Catalog,
    ) -> Result<&'c ResourceDescriptor, OrganizeError> {
        let header = ManifestHeader::from_document(doc)?;
        let key = resource_key(api_group(header.api_version), header.kind);

        if self.is_skipped(&key) {
            return Err(OrganizeError::SkippedResourceType(key));
        }

        let descriptor = catalog
            .get(&key)
            .ok_or_else(|| OrganizeError::UnknownResourceType(key.clone()))?;

        if self.warn_on_namespaced && descriptor.namespaced {
            warn!("{}: organizing namespaced resource", key);
        }

        Ok(descriptor)
    }
}
