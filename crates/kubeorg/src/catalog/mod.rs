//! Index of known API resource types.
//!
//! The catalog answers one question for the classifier: given an API group
//! and a kind, which plural name does the type live under, and is it
//! namespaced. It is built once per run and never mutated afterwards.

pub mod descriptor;
pub mod source;

use std::collections::HashMap;
use std::io::Read;

use tracing::debug;

use crate::error::CatalogError;

pub use descriptor::{resource_key, ResourceDescriptor, CORE_GROUP};
pub use source::{CatalogSource, API_RESOURCES_ENV};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: HashMap<String, ResourceDescriptor>,
}

impl Catalog {
    /// Builds the catalog, silently dropping subresource entries.
    ///
    /// Later descriptors with the same `group/kind` replace earlier ones, so
    /// a discovery dump listing several versions of a group keeps the last.
    pub fn new(descriptors: impl IntoIterator<Item = ResourceDescriptor>) -> Self {
        let mut resources = HashMap::new();
        for descriptor in descriptors {
            if descriptor.is_subresource() {
                debug!("Ignoring subresource {}", descriptor.name);
                continue;
            }
            resources.insert(descriptor.key(), descriptor);
        }

        Self { resources }
    }

    /// Parses a JSON array of discovery records.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let descriptors: Vec<ResourceDescriptor> = serde_json::from_str(content)?;
        Ok(Self::new(descriptors))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let descriptors: Vec<ResourceDescriptor> = serde_json::from_reader(reader)?;
        Ok(Self::new(descriptors))
    }

    pub fn lookup(&self, api_group: &str, kind: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(&resource_key(api_group, kind))
    }

    pub fn get(&self, key: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(key)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
