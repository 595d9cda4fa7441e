pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod organizer;
pub mod overlay;
pub mod resolver;
pub mod scanner;

pub use catalog::{Catalog, CatalogSource, ResourceDescriptor};
pub use classifier::{group_of, Classifier};
pub use cli::Cli;
pub use config::OrganizerConfig;
pub use error::{CatalogError, KubeorgError, OrganizeError, Result, StorageError};
pub use manifest::{Document, ManifestHeader, YamlWriter};
pub use organizer::{BatchReport, OrganizeOutcome, Organizer};
pub use overlay::OverlayManager;
pub use scanner::{CleanLevel, ManifestScanner};
