//! CLI error types.

use folio_config::ConfigError;
use folio_content::PublishError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid edit surface: {0}")]
    Surface(#[from] serde_json::Error),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Server(String),
}
