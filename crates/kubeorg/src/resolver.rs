//! Destination paths for organized manifests.
//!
//! Layout: `<dest>/<apiGroup>/<plural>/<name>/<kind>.yaml`, with the kind
//! lowercased. Every resource instance gets its own directory, so a
//! `kustomization.yaml` next to it lists exactly the manifests for that
//! instance.

use std::path::{Component, Path, PathBuf};

use crate::catalog::ResourceDescriptor;
use crate::error::OrganizeError;
use crate::manifest::ManifestHeader;

pub const MANIFEST_EXTENSION: &str = "yaml";

/// Computes where a classified manifest belongs. Pure: no filesystem access.
pub fn resolve(
    header: &ManifestHeader<'_>,
    descriptor: &ResourceDescriptor,
    dest_root: &Path,
) -> Result<PathBuf, OrganizeError> {
    let name = match header.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(OrganizeError::MissingName),
    };
    validate_segment(name)?;

    Ok(dest_root
        .join(&descriptor.api_group)
        .join(&descriptor.name)
        .join(name)
        .join(format!(
            "{}.{}",
            descriptor.kind.to_lowercase(),
            MANIFEST_EXTENSION
        )))
}

/// A resource name must stay a single path component below the plural
/// directory.
fn validate_segment(name: &str) -> Result<(), OrganizeError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(()),
        _ => Err(OrganizeError::InvalidName(name.to_string())),
    }
}
