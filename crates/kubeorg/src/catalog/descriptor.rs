//! API resource type descriptors, as produced by cluster API discovery.

use serde::{Deserialize, Serialize};

/// The API group used for resources served under `/api/v1`.
pub const CORE_GROUP: &str = "core";

/// One known resource type: which API group serves a kind, and under what
/// plural name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// API group, `core` for the legacy core group.
    pub api_group: String,

    /// Resource kind, e.g. `Deployment`.
    pub kind: String,

    /// Plural resource name, e.g. `deployments`.
    pub name: String,

    /// Whether instances of this type live in a namespace.
    #[serde(default)]
    pub namespaced: bool,
}

impl ResourceDescriptor {
    pub fn new(
        api_group: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        namespaced: bool,
    ) -> Self {
        Self {
            api_group: api_group.into(),
            kind: kind.into(),
            name: name.into(),
            namespaced,
        }
    }

    /// The catalog key for this descriptor, `apiGroup/kind`.
    pub fn key(&self) -> String {
        resource_key(&self.api_group, &self.kind)
    }

    /// Discovery also reports subresources (`deployments/scale`,
    /// `pods/log`); those are not addressable types of their own.
    pub fn is_subresource(&self) -> bool {
        self.name.contains('/')
    }
}

/// Builds the `group/kind` key used both for catalog lookups and skip patterns.
pub fn resource_key(api_group: &str, kind: &str) -> String {
    format!("{}/{}", api_group, kind)
}
