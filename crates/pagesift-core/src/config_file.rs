use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::filter::{DEFAULT_SNIPPET_CHARS, FilterOptions};
use crate::text::CaseLocale;

pub const DEFAULT_BIND: &str = "0.0.0.0:5001";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;
pub const DEFAULT_LOCALE: &str = "sr";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub filter: Option<FilterConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub max_upload_mb: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub snippet_chars: Option<usize>,
    pub locale: Option<String>,
}

/// Platform config directory path: `<config_dir>/pagesift/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pagesift").join("config.toml"))
}

/// Load config by cascading CWD `.pagesift.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pagesift.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_server = base.server.unwrap_or_default();
    let overlay_server = overlay.server.unwrap_or_default();
    let base_filter = base.filter.unwrap_or_default();
    let overlay_filter = overlay.filter.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            bind: overlay_server.bind.or(base_server.bind),
            max_upload_mb: overlay_server.max_upload_mb.or(base_server.max_upload_mb),
        }),
        filter: Some(FilterConfig {
            snippet_chars: overlay_filter.snippet_chars.or(base_filter.snippet_chars),
            locale: overlay_filter.locale.or(base_filter.locale),
        }),
    }
}

/// Fully resolved runtime settings: env vars > config file > defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind: String,
    pub max_upload_mb: u64,
    pub snippet_chars: usize,
    pub locale: CaseLocale,
}

impl Settings {
    /// Resolve settings against the process environment.
    pub fn from_env(config: &ConfigFile) -> Self {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `env` to look up overrides
    /// (`PAGESIFT_BIND`, `PAGESIFT_MAX_UPLOAD_MB`, `PAGESIFT_SNIPPET_CHARS`,
    /// `PAGESIFT_LOCALE`).
    pub fn resolve(config: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let server = config.server.clone().unwrap_or_default();
        let filter = config.filter.clone().unwrap_or_default();

        let bind = env("PAGESIFT_BIND")
            .filter(|v| !v.trim().is_empty())
            .or(server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let max_upload_mb = parse_env(&env, "PAGESIFT_MAX_UPLOAD_MB")
            .or(server.max_upload_mb)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        let snippet_chars = parse_env(&env, "PAGESIFT_SNIPPET_CHARS")
            .or(filter.snippet_chars)
            .unwrap_or(DEFAULT_SNIPPET_CHARS);
        let locale_tag = env("PAGESIFT_LOCALE")
            .or(filter.locale)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Self {
            bind,
            max_upload_mb,
            snippet_chars,
            locale: CaseLocale::from_tag(&locale_tag),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            locale: self.locale,
            snippet_chars: self.snippet_chars,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&ConfigFile::default(), |_| None)
    }
}

fn parse_env<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid environment override");
            None
        }
    }
}
