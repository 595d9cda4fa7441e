//! Builders for manifest documents used across tests.

#![allow(dead_code)]

use serde_yaml::{Mapping, Value};

/// Builds a manifest mapping one field at a time.
pub struct ManifestBuilder {
    doc: Mapping,
}

impl ManifestBuilder {
    pub fn new(api_version: &str, kind: &str) -> Self {
        let mut doc = Mapping::new();
        doc.insert("apiVersion".into(), api_version.into());
        doc.insert("kind".into(), kind.into());
        Self { doc }
    }

    /// A manifest with neither `apiVersion` nor `kind`.
    pub fn bare() -> Self {
        Self {
            doc: Mapping::new(),
        }
    }

    pub fn without(mut self, key: &str) -> Self {
        self.doc.remove(key);
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        let mut metadata = Mapping::new();
        metadata.insert("name".into(), name.into());
        self.doc.insert("metadata".into(), Value::Mapping(metadata));
        self
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.doc.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Value {
        Value::Mapping(self.doc)
    }
}

pub fn deployment(name: &str) -> Value {
    ManifestBuilder::new("apps/v1", "Deployment").name(name).build()
}

pub fn service(name: &str) -> Value {
    ManifestBuilder::new("v1", "Service").name(name).build()
}

pub fn namespace(name: &str) -> Value {
    ManifestBuilder::new("v1", "Namespace").name(name).build()
}

/// Parses a YAML mapping literal, e.g. an overlay template.
pub fn mapping(yaml: &str) -> Mapping {
    serde_yaml::from_str(yaml).expect("Invalid mapping literal")
}
