//! `folio serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config, StoreBackend};
use folio_server::{run_server, server_config_from_folio_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep content in memory only.
    #[arg(long)]
    memory: bool,

    /// Enable the WebSocket change feed (default: enabled).
    #[arg(long)]
    changes: Option<bool>,

    /// Disable the WebSocket change feed.
    #[arg(long, conflicts_with = "changes")]
    no_changes: bool,

    /// Enable verbose output (request and publish logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        match config.store.backend {
            StoreBackend::Fs => output.info(&format!(
                "Content directory: {}",
                config.store.content_dir.display()
            )),
            StoreBackend::Memory => output.warning("Content store: in-memory (lost on exit)"),
        }
        if config.changes.enabled {
            output.info("Change feed: /ws/changes");
        } else {
            output.info("Change feed: disabled");
        }
        if config.server.admin_token().is_none() {
            output.warning("No admin token configured; anyone can publish");
        }

        let server_config = server_config_from_folio_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            content_dir: self.content_dir.clone(),
            backend: self.memory.then_some(StoreBackend::Memory),
            changes_enabled: self.resolve_changes_enabled(),
        }
    }

    /// Resolve `changes_enabled` from --changes/--no-changes flags.
    fn resolve_changes_enabled(&self) -> Option<bool> {
        self.no_changes.then_some(false).or(self.changes)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ServeArgs,
    }

    fn parse(args: &[&str]) -> ServeArgs {
        TestCli::parse_from(std::iter::once("serve").chain(args.iter().copied())).args
    }

    #[test]
    fn test_defaults_override_nothing() {
        let settings = parse(&[]).cli_settings();

        assert!(settings.host.is_none());
        assert!(settings.port.is_none());
        assert!(settings.backend.is_none());
        assert!(settings.changes_enabled.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let settings = parse(&[
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--memory",
            "--no-changes",
        ])
        .cli_settings();

        assert_eq!(settings.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(settings.port, Some(9000));
        assert_eq!(settings.backend, Some(StoreBackend::Memory));
        assert_eq!(settings.changes_enabled, Some(false));
    }

    #[test]
    fn test_explicit_changes_flag() {
        assert_eq!(
            parse(&["--changes", "true"]).resolve_changes_enabled(),
            Some(true)
        );
    }
}
