use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KubeorgError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Directory scan failed for '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read manifests from stdin: {0}")]
    Stdin(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read resource catalog '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse resource catalog JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

/// Why a single manifest (or a whole source file) could not be organized.
///
/// None of these abort a batch; they are recorded in the report and the
/// organizer moves on to the next document.
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("Not a Kubernetes resource (missing apiVersion or kind)")]
    NotAResource,

    #[error("Resource type '{0}' is not organized")]
    SkippedResourceType(String),

    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("Resource has no metadata.name")]
    MissingName,

    #[error("Invalid resource name '{0}'")]
    InvalidName(String),

    #[error("Target already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Failed to read manifest '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in '{path}': {message}")]
    ParseYaml { path: PathBuf, message: String },

    #[error("Failed to serialize YAML: {0}")]
    SerializeYaml(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy file from '{from}' to '{to}': {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn io_error(&self) -> &std::io::Error {
        match self {
            StorageError::CreateDirectory { source, .. }
            | StorageError::WriteFile { source, .. }
            | StorageError::CopyFile { source, .. }
            | StorageError::RemoveFile { source, .. } => source,
        }
    }

    /// Returns true if the failure means the destination cannot take any more
    /// writes, so continuing with the rest of the batch is pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.io_error().kind(),
            ErrorKind::PermissionDenied
                | ErrorKind::StorageFull
                | ErrorKind::ReadOnlyFilesystem
                | ErrorKind::OutOfMemory
        )
    }
}

impl OrganizeError {
    /// Returns true if this error should stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OrganizeError::Storage(e) if e.is_fatal())
    }
}

pub type Result<T> = std::result::Result<T, KubeorgError>;
