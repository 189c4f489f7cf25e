//! Schema Miner configuration.
//!
//! | Source | Notes |
//! |--------|-------|
//! | built-in defaults | see table below |
//! | `$SCHEMA_MINER_CONFIG` (default `config/schema-miner.toml`) | optional, skipped when absent |
//! | `SCHEMA_MINER__<FIELD>` env vars | highest precedence, e.g. `SCHEMA_MINER__PORT=8080` |
//!
//! | Field | Default |
//! |-------|---------|
//! | app_name | Schema Miner |
//! | host | 127.0.0.1 |
//! | port | 7860 |
//! | template_path | schema_miner/json_template.json |
//! | template_encoding | utf-8 |
//! | open_browser | false |
//! | max_upload_bytes | 52428800 (50 MiB) |

use crate::error::ConfigError;
use crate::template::{TemplateSource, TextEncoding};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "SCHEMA_MINER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/schema-miner.toml";
pub const DEFAULT_TEMPLATE_PATH: &str = "schema_miner/json_template.json";
pub const DEFAULT_PORT: u16 = 7860;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub template_path: PathBuf,
    pub template_encoding: String,
    #[serde(default)]
    pub open_browser: bool,
    /// Request body cap for document uploads.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            app_name: "Schema Miner".to_string(),
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            template_encoding: TextEncoding::Utf8.label().to_string(),
            open_browser: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl MinerConfig {
    /// Load from defaults, the optional config file named by `SCHEMA_MINER_CONFIG`, then env.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Same as [`MinerConfig::load`] with an explicit file path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let defaults = MinerConfig::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default(
                "template_path",
                defaults.template_path.to_string_lossy().into_owned(),
            )?
            .set_default("template_encoding", defaults.template_encoding)?
            .set_default("open_browser", defaults.open_browser)?
            .set_default("max_upload_bytes", defaults.max_upload_bytes as i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("SCHEMA_MINER").separator("__"))
            .build()?;

        let cfg: MinerConfig = built.try_deserialize()?;
        // Fail at startup rather than on the first render.
        cfg.encoding()?;
        Ok(cfg)
    }

    pub fn encoding(&self) -> Result<TextEncoding, ConfigError> {
        self.template_encoding
            .parse()
            .map_err(ConfigError::UnsupportedEncoding)
    }

    pub fn template_source(&self) -> Result<TemplateSource, ConfigError> {
        Ok(TemplateSource::new(self.template_path.clone(), self.encoding()?))
    }

    /// Resolve `host`/`port` to listen addresses. Accepts IP literals (v4 or v6) and hostnames.
    pub fn bind_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        let bind_error = |source: std::io::Error| ConfigError::BindAddr {
            host: self.host.clone(),
            port: self.port,
            source,
        };
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(bind_error)?
            .collect();
        if addrs.is_empty() {
            return Err(bind_error(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "host resolved to no addresses",
            )));
        }
        Ok(addrs)
    }
}
