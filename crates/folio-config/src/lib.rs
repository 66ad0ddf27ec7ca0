//! `folio.toml` loading.
//!
//! [`Config::load`] reads an explicit file or the first `folio.toml` found
//! walking up from the working directory, falling back to built-in defaults.
//! Relative paths resolve against the file's directory, and [`CliSettings`]
//! are laid on top last.
//!
//! `server.host`, `server.admin_token` and every `editor.asset_origins` entry
//! may reference environment variables as `${VAR}` (required) or
//! `${VAR:-default}`:
//!
//! ```toml
//! [server]
//! admin_token = "${FOLIO_ADMIN_TOKEN:-}"
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line overrides. `None` leaves the loaded value alone.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override store backend.
    pub backend: Option<StoreBackend>,
    /// Override change feed enabled flag.
    pub changes_enabled: Option<bool>,
}

const CONFIG_FILENAME: &str = "folio.toml";
const DEFAULT_CONTENT_DIR: &str = "content";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Store configuration (content dir is a relative string from TOML).
    #[serde(rename = "store")]
    store_raw: StoreConfigRaw,
    /// Change feed configuration.
    pub changes: ChangesConfig,
    /// Editor configuration.
    pub editor: EditorConfig,
    /// Section routing configuration.
    pub routing: RoutingConfig,

    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Bearer token required for writes. Empty or unset disables the check.
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            admin_token: None,
        }
    }
}

impl ServerConfig {
    /// Admin token, if one is configured and non-empty.
    #[must_use]
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Store backend selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One JSON file per page in the content directory.
    #[default]
    Fs,
    /// In-memory; content is lost on exit.
    Memory,
}

/// Raw store configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    backend: Option<StoreBackend>,
    content_dir: Option<String>,
}

/// Resolved store configuration with absolute paths.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// Store backend.
    pub backend: StoreBackend,
    /// Directory holding page documents (fs backend).
    pub content_dir: PathBuf,
}

/// Change feed configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChangesConfig {
    /// Whether the WebSocket change feed is served.
    pub enabled: bool,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Editor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Origins whose prefix is stripped from captured image URLs.
    pub asset_origins: Vec<String>,
    /// How long publish status indicators stay visible, in milliseconds.
    pub status_display_ms: u64,
    /// Reject publishes based on a stale copy of the page.
    pub concurrency_check: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            asset_origins: vec!["http://localhost:3001".to_owned()],
            status_display_ms: 3000,
            concurrency_check: true,
        }
    }
}

/// Section routing configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Extra key renames, applied after the built-in ones.
    pub key_aliases: Vec<KeyAliasConfig>,
}

/// One `[[routing.key_aliases]]` entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct KeyAliasConfig {
    /// Page name.
    pub page: String,
    /// Canonical section name.
    pub section: String,
    /// Key produced by the editor.
    pub from: String,
    /// Key the renderer reads.
    pub to: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.admin_token`").
        field: String,
        /// Error message (e.g., "${`FOLIO_ADMIN_TOKEN`} not set").
        message: String,
    },
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

fn non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn http_origin(origin: &str, field: &str) -> Result<(), ConfigError> {
    non_empty(origin, field)?;
    let scheme_ok = ["http://", "https://"]
        .iter()
        .any(|scheme| origin.starts_with(scheme));
    if !scheme_ok {
        return Err(invalid(format!(
            "{field} entry '{origin}' must be an http:// or https:// origin"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration, then apply CLI settings.
    ///
    /// An explicit `config_path` must exist. Without one, the nearest
    /// `folio.toml` in the working directory or its ancestors is used, and
    /// defaults apply when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing, the file cannot be
    /// read or parsed, an environment variable is unset, or the result fails
    /// validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let source = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_config(),
        };
        let mut config = match source {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default_with_cwd(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let CliSettings {
            host,
            port,
            content_dir,
            backend,
            changes_enabled,
        } = settings;

        if let Some(host) = host {
            self.server.host.clone_from(host);
        }
        self.server.port = port.unwrap_or(self.server.port);
        if let Some(dir) = content_dir {
            self.store.content_dir.clone_from(dir);
        }
        self.store.backend = backend.unwrap_or(self.store.backend);
        self.changes.enabled = changes_enabled.unwrap_or(self.changes.enabled);
    }

    /// Nearest `folio.toml` in the working directory or its ancestors.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        cwd.ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn default_with_cwd() -> Self {
        Self::default_with_base(&std::env::current_dir().unwrap_or_default())
    }

    /// Defaults, with the content directory under `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            store_raw: StoreConfigRaw::default(),
            changes: ChangesConfig::default(),
            editor: EditorConfig::default(),
            routing: RoutingConfig::default(),
            store: StoreConfig {
                backend: StoreBackend::Fs,
                content_dir: base.join(DEFAULT_CONTENT_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)?;

        config.expand_env_vars()?;
        config.resolve_paths(path.parent().unwrap_or(Path::new(".")));
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Check value constraints.
    ///
    /// Runs after a file is loaded and again after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(invalid("server.port cannot be 0"));
        }

        for origin in &self.editor.asset_origins {
            http_origin(origin, "editor.asset_origins")?;
        }
        if self.editor.status_display_ms == 0 {
            return Err(invalid("editor.status_display_ms must be greater than 0"));
        }

        for (i, alias) in self.routing.key_aliases.iter().enumerate() {
            for (name, value) in [
                ("page", &alias.page),
                ("section", &alias.section),
                ("from", &alias.from),
                ("to", &alias.to),
            ] {
                non_empty(value, &format!("routing.key_aliases.{name} (entry {i})"))?;
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.server.admin_token = self
            .server
            .admin_token
            .as_deref()
            .map(|token| expand::expand_env(token, "server.admin_token"))
            .transpose()?;
        for origin in &mut self.editor.asset_origins {
            *origin = expand::expand_env(origin, "editor.asset_origins")?;
        }
        Ok(())
    }

    /// Turn the raw `[store]` table into a [`StoreConfig`] rooted at `config_dir`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let content_dir = self
            .store_raw
            .content_dir
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_DIR);
        self.store = StoreConfig {
            backend: self.store_raw.backend.unwrap_or_default(),
            content_dir: config_dir.join(content_dir),
        };
    }
}
