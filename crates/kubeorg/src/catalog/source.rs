use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Catalog;
use crate::error::CatalogError;

/// Environment variable naming a catalog JSON file.
pub const API_RESOURCES_ENV: &str = "KUBEORG_API_RESOURCES";

const BUNDLED_RESOURCES: &str = include_str!("../../data/resources.json");

/// Where the resource catalog is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "path")]
pub enum CatalogSource {
    /// A file given explicitly, e.g. on the command line.
    File(PathBuf),
    /// A file named by `KUBEORG_API_RESOURCES`.
    Environment(PathBuf),
    /// The catalog shipped with the binary.
    #[default]
    Bundled,
}

impl CatalogSource {
    /// Picks the explicit path if given, then the environment variable, then
    /// the bundled catalog.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return CatalogSource::File(path);
        }

        match std::env::var_os(API_RESOURCES_ENV) {
            Some(path) if !path.is_empty() => CatalogSource::Environment(PathBuf::from(path)),
            _ => CatalogSource::Bundled,
        }
    }

    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let catalog = match self {
            CatalogSource::File(path) | CatalogSource::Environment(path) => {
                let file = File::open(path).map_err(|e| CatalogError::ReadFile {
                    path: path.clone(),
                    source: e,
                })?;
                Catalog::from_reader(BufReader::new(file))?
            }
            CatalogSource::Bundled => Catalog::from_json_str(BUNDLED_RESOURCES)?,
        };

        debug!("Read {} api resources from {}", catalog.len(), self);
        Ok(catalog)
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Environment(path) => {
                write!(f, "{} (from {})", path.display(), API_RESOURCES_ENV)
            }
            CatalogSource::Bundled => write!(f, "<bundled>"),
        }
    }
}
