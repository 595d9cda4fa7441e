//! kubeorg
//!
//! Sorts Kubernetes manifests into `<group>/<resource>/<name>/<kind>.yaml`
//! and writes a `kustomization.yaml` next to each one.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use kubeorg::{logging, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.run() {
        Ok(report) if report.has_failures() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}
