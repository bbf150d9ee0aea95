//! State shared by the subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use hkp::{Endpoint, HttpTransport, KeyServer};

use crate::cli::output::OutputFormat;

/// The effective settings.
///
/// The command line arguments, the configuration file, and the
/// defaults are combined in `main`.
#[derive(Debug)]
pub struct App {
    pub verbose: bool,
    pub quiet: bool,
    pub force: bool,

    /// The configuration file, if any.
    pub config_file: Option<PathBuf>,

    pub keyserver: String,
    pub port: Option<u16>,
    pub options: Vec<String>,
    pub output_format: OutputFormat,
}

impl App {
    /// Returns the keyserver's location.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let endpoint = Endpoint::new(&self.keyserver)
            .with_context(|| format!("Invalid keyserver {:?}", self.keyserver))?;
        Ok(match self.port {
            Some(port) => endpoint.with_port(port),
            None => endpoint,
        })
    }

    /// Returns a handle for the keyserver.
    pub fn keyserver(&self) -> Result<KeyServer> {
        let transport = HttpTransport::new()
            .context("Creating the HTTP client failed")?;
        Ok(KeyServer::with_transport(self.endpoint()?, transport))
    }

    /// Prints an informational message, unless in quiet mode.
    pub fn info(&self, msg: std::fmt::Arguments) {
        if ! self.quiet {
            weprintln!("{}", msg);
        }
    }
}
