//! `flatpage serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use flatpage_config::{CliSettings, Config};
use flatpage_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover flatpage.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config and the PORT environment variable).
    #[arg(short, long)]
    port: Option<u16>,

    /// Treat a malformed JSON sidecar as a server error instead of
    /// rendering the page with empty data.
    #[arg(long)]
    strict_sidecar: bool,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to
    /// start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            strict_sidecar: self.strict_sidecar.then_some(true),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Serving pages on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Content directory: {}",
            config.content.page_dir.display()
        ));

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|err| CliError::Server(err.to_string()))
    }
}
