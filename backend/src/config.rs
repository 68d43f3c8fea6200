//! Server configuration read from the environment.
//!
//! | Variable       | Default              |
//! |----------------|----------------------|
//! | `HOST`         | `0.0.0.0`            |
//! | `PORT`         | `3000`               |
//! | `DATABASE_URL` | `sqlite://todos.db`  |
//! | `STATIC_DIR`   | `frontend/dist`      |
//! | `LOG_FORMAT`   | `text` (or `json`)   |
//!
//! `RUST_LOG` is read separately by the tracing subscriber.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT '{0}': expected an integer between 0 and 65535")]
    InvalidPort(String),
    #[error("invalid LOG_FORMAT '{0}': expected 'text' or 'json'")]
    InvalidLogFormat(String),
    #[error("{0} is not valid UTF-8")]
    NotUnicode(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Builds a config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let read = |key: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(key) {
                Ok(value) => {
                    let trimmed = value.trim();
                    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
                }
                Err(env::VarError::NotPresent) => Ok(None),
                Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
            }
        };

        let defaults = Self::default();

        let port = match read("PORT")? {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => defaults.port,
        };

        let log_format = match read("LOG_FORMAT")? {
            Some(value) => value.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            host: read("HOST")?.unwrap_or(defaults.host),
            port,
            database_url: read("DATABASE_URL")?.unwrap_or(defaults.database_url),
            static_dir: read("STATIC_DIR")?
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
