//! Command line interface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::catalog::CatalogSource;
use crate::config::OrganizerConfig;
use crate::error::Result;
use crate::manifest::YamlWriter;
use crate::organizer::{BatchReport, Organizer};
use crate::scanner::{self, CleanLevel, ManifestScanner, STDIN_LABEL};

#[derive(Parser, Debug)]
#[command(
    name = "kubeorg",
    version,
    about = "Organize Kubernetes manifests into <group>/<resource>/<name>/ directories"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON resource catalog (defaults to $KUBEORG_API_RESOURCES, then the bundled catalog)
    #[arg(short = 'r', long = "resources", global = true)]
    pub resources: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Organize every manifest below a directory
    Tree {
        /// Directory to read manifests from
        source: PathBuf,

        /// Destination root (defaults to SOURCE)
        #[arg(short, long, env = "KUBEORG_DEST")]
        dest: Option<PathBuf>,

        /// Remove existing kustomization.yaml files (-k), and organized sources too (-kk)
        #[arg(short = 'k', long, action = ArgAction::Count)]
        clean: u8,

        /// Copy single-document files verbatim, keeping comments and formatting
        #[arg(long)]
        preserve: bool,

        #[command(flatten)]
        options: OrganizeArgs,
    },

    /// Organize the given files, or stdin when none are given
    Files {
        /// Manifest files to read
        sources: Vec<PathBuf>,

        /// Destination root
        #[arg(short, long, env = "KUBEORG_DEST", default_value = ".")]
        dest: PathBuf,

        #[command(flatten)]
        options: OrganizeArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OrganizeArgs {
    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,

    /// Do not write kustomization.yaml files
    #[arg(long)]
    pub no_kustomize: bool,

    /// Show what would be written without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable optional warnings
    #[arg(short, long = "warn", value_enum)]
    pub warnings: Vec<Warning>,

    /// Additional group/kind glob pattern to leave alone (repeatable)
    #[arg(long = "skip", value_name = "PATTERN")]
    pub skip_patterns: Vec<String>,

    /// Comment written at the top of every generated file
    #[arg(long, value_name = "TEXT")]
    pub header_comment: Option<String>,

    /// Start every generated file with an explicit `---`
    #[arg(long)]
    pub document_marker: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// Warn for every namespaced resource organized
    Namespaced,
}

impl OrganizeArgs {
    pub fn to_config(&self, dest: PathBuf, catalog_source: CatalogSource) -> OrganizerConfig {
        let mut config = OrganizerConfig::new(dest)
            .with_catalog_source(catalog_source)
            .with_force(self.force)
            .with_overlays(!self.no_kustomize)
            .with_dry_run(self.dry_run)
            .with_warn_on_namespaced(self.warnings.contains(&Warning::Namespaced))
            .with_writer(self.writer());
        config.skip_patterns = self.skip_patterns.clone();
        config
    }

    fn writer(&self) -> YamlWriter {
        let writer = YamlWriter::new().with_document_marker(self.document_marker);
        match &self.header_comment {
            Some(comment) => writer.with_header_comment(comment),
            None => writer,
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<BatchReport> {
        let catalog_source = CatalogSource::resolve(self.resources);

        let report = match self.command {
            Command::Tree {
                source,
                dest,
                clean,
                preserve,
                options,
            } => {
                let dest = dest.unwrap_or_else(|| source.clone());
                let mut organizer = Organizer::from_config(options.to_config(dest, catalog_source))?;
                ManifestScanner::new(&source)
                    .with_clean(CleanLevel::from_count(clean))
                    .with_preserve(preserve)
                    .organize_tree(&mut organizer)?
            }
            Command::Files {
                sources,
                dest,
                options,
            } => {
                let mut organizer = Organizer::from_config(options.to_config(dest, catalog_source))?;
                if sources.is_empty() {
                    scanner::organize_reader(&mut organizer, std::io::stdin().lock(), STDIN_LABEL)?
                } else {
                    scanner::organize_files(&mut organizer, &sources)?
                }
            }
        };

        info!(
            "Organized {} resources, {} skipped",
            report.written_count(),
            report.failure_count()
        );
        Ok(report)
    }
}
