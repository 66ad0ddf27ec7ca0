//! Shared setup for the content commands (`show`, `draft`, `publish`).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use folio_config::{CliSettings, Config, StoreBackend};
use folio_content::{
    ContentBackend, EditSurface, FieldExtractor, HttpBackend, KeyAlias, LocalBackend,
    PathNormalizer, PublishController, SectionRouter,
};
use folio_store::{ContentStore, FsStore, MemoryStore};

use crate::error::CliError;

/// Where page content comes from.
#[derive(Args)]
pub(crate) struct ContentArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folio server URL; when unset, the content directory is used directly.
    #[arg(long, env = "FOLIO_SERVER")]
    server: Option<String>,

    /// Content directory (overrides config; ignored with --server).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Admin token sent with writes to --server.
    #[arg(long, env = "FOLIO_ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl ContentArgs {
    /// Load configuration and build a publish controller.
    pub(crate) fn controller(
        &self,
    ) -> Result<PublishController<Box<dyn ContentBackend>>, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        Ok(self.controller_with(&config))
    }

    fn controller_with(&self, config: &Config) -> PublishController<Box<dyn ContentBackend>> {
        let backend: Box<dyn ContentBackend> = match &self.server {
            Some(url) => {
                tracing::debug!(server = %url, "Using HTTP content backend");
                let token = self
                    .token
                    .as_deref()
                    .or_else(|| config.server.admin_token());
                let backend = HttpBackend::new(url);
                Box::new(match token {
                    Some(token) => backend.with_token(token),
                    None => backend,
                })
            }
            None => {
                tracing::debug!(
                    content_dir = %config.store.content_dir.display(),
                    backend = ?config.store.backend,
                    "Using local content store"
                );
                let store: Arc<dyn ContentStore> = match config.store.backend {
                    StoreBackend::Fs => Arc::new(FsStore::new(config.store.content_dir.clone())),
                    StoreBackend::Memory => Arc::new(MemoryStore::new()),
                };
                Box::new(LocalBackend::new(store))
            }
        };

        PublishController::new(backend)
            .with_extractor(extractor(config))
            .with_status_display(Duration::from_millis(config.editor.status_display_ms))
            .with_concurrency_check(config.editor.concurrency_check)
    }
}

/// Field extractor configured with the asset origins and key aliases from config.
pub(crate) fn extractor(config: &Config) -> FieldExtractor {
    let aliases = config
        .routing
        .key_aliases
        .iter()
        .map(|a| KeyAlias::new(&a.page, &a.section, &a.from, &a.to));
    FieldExtractor::new(
        PathNormalizer::new(&config.editor.asset_origins),
        SectionRouter::with_key_aliases(aliases),
    )
}

/// Read an edit surface from a JSON file.
pub(crate) fn read_surface(path: &Path) -> Result<EditSurface, CliError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
