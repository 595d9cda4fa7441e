//! Manifest documents: parsing multi-document YAML, the fields needed to
//! place a manifest, and how manifests are written back out.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::OrganizeError;

/// A single parsed YAML document.
pub type Document = Value;

/// The fields of a manifest the organizer cares about.
///
/// Building a header is the guard every classification starts with: a
/// document without a string `apiVersion` and `kind` is not a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestHeader<'a> {
    pub api_version: &'a str,
    pub kind: &'a str,
    pub name: Option<&'a str>,
}

impl<'a> ManifestHeader<'a> {
    pub fn from_document(doc: &'a Document) -> Result<Self, OrganizeError> {
        let api_version = doc.get("apiVersion").and_then(Value::as_str);
        let kind = doc.get("kind").and_then(Value::as_str);

        let (Some(api_version), Some(kind)) = (api_version, kind) else {
            return Err(OrganizeError::NotAResource);
        };

        let name = doc
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str);

        Ok(Self {
            api_version,
            kind,
            name,
        })
    }
}

/// Parses every document in a YAML stream.
///
/// One malformed document fails the whole stream: a file that does not
/// parse cleanly is skipped as a unit rather than partially organized.
pub fn parse_documents(content: &str, path: &Path) -> Result<Vec<Document>, OrganizeError> {
    serde_yaml::Deserializer::from_str(content)
        .map(|de| {
            Value::deserialize(de).map_err(|e| OrganizeError::ParseYaml {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Parses an overlay descriptor found in a source tree so it can be reused
/// as a template. Anything that is not a mapping is rejected.
pub fn parse_overlay_template(content: &str, path: &Path) -> Result<Mapping, OrganizeError> {
    serde_yaml::from_str(content).map_err(|e| OrganizeError::ParseYaml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Output formatting for everything the organizer writes.
///
/// Strings containing a newline are always written as literal block scalars
/// (`|`), which keeps embedded scripts and certificates readable. serde_yaml
/// picks that style on its own; the writer only controls the framing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YamlWriter {
    /// Prefix every written file with an explicit `---` document marker.
    #[serde(default)]
    pub document_marker: bool,

    /// Comment line placed at the top of every written file.
    #[serde(default)]
    pub header_comment: Option<String>,
}

impl YamlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_comment(mut self, comment: impl Into<String>) -> Self {
        self.header_comment = Some(comment.into());
        self
    }

    pub fn with_document_marker(mut self, enabled: bool) -> Self {
        self.document_marker = enabled;
        self
    }

    pub fn to_string<T: Serialize>(&self, value: &T) -> Result<String, OrganizeError> {
        let body =
            serde_yaml::to_string(value).map_err(|e| OrganizeError::SerializeYaml(e.to_string()))?;

        let mut out = String::with_capacity(body.len() + 64);
        if let Some(comment) = &self.header_comment {
            for line in comment.lines() {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        if self.document_marker {
            out.push_str("---\n");
        }
        out.push_str(&body);
        Ok(out)
    }
}
