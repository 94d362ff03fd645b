//! Process settings read from the environment and an optional `.env` file.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Backend locations and runtime switches.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub project_name: String,
    pub redis_host: String,
    pub redis_port: u16,
    /// URL scheme prefix, e.g. `http://`
    pub elastic_schema: String,
    pub elastic_host: String,
    pub elastic_port: u16,
    /// Serve API docs only; no backend connections are made.
    pub docs_only: bool,
    pub cache_ttl: Duration,
    /// Transport timeout for both backends.
    pub backend_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            project_name: "movies-api".to_string(),
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            elastic_schema: "http://".to_string(),
            elastic_host: "127.0.0.1".to_string(),
            elastic_port: 9200,
            docs_only: false,
            cache_ttl: Duration::from_secs(300),
            backend_timeout: Duration::from_secs(5),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables, after loading `.env`
    /// from the working directory or its parents when one exists.
    ///
    /// Variables already set in the process win over the file. Unset variables
    /// keep their defaults.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `.env` is malformed or a variable is set to
    /// an invalid value.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::ConfigError(format!(".env: {}", e))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings from a dotenv-style file without touching the process
    /// environment. Process variables still win over the file.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the file is missing or malformed, or a
    /// variable holds an invalid value.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_error = |e: dotenvy::Error| Error::ConfigError(format!("{}: {}", path.display(), e));

        let vars: HashMap<String, String> = dotenvy::from_path_iter(path)
            .map_err(file_error)?
            .collect::<std::result::Result<_, _>>()
            .map_err(file_error)?;

        debug!("Read {} variables from {}", vars.len(), path.display());
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| vars.get(key).cloned()))
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if a variable holds an unparsable value or a
    /// zero duration.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let settings = Settings {
            project_name: lookup("PROJECT_NAME").unwrap_or(defaults.project_name),
            redis_host: lookup("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: parse_or(&lookup, "REDIS_PORT", defaults.redis_port)?,
            elastic_schema: lookup("ELASTIC_SCHEMA").unwrap_or(defaults.elastic_schema),
            elastic_host: lookup("ELASTIC_HOST").unwrap_or(defaults.elastic_host),
            elastic_port: parse_or(&lookup, "ELASTIC_PORT", defaults.elastic_port)?,
            docs_only: match lookup("DOCS_ONLY") {
                Some(raw) => parse_bool("DOCS_ONLY", &raw)?,
                None => defaults.docs_only,
            },
            cache_ttl: parse_secs(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl)?,
            backend_timeout: parse_secs(&lookup, "BACKEND_TIMEOUT_SECS", defaults.backend_timeout)?,
        };

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Elasticsearch base URL.
    pub fn elastic_url(&self) -> String {
        format!(
            "{}{}:{}",
            self.elastic_schema, self.elastic_host, self.elastic_port
        )
    }

    #[cfg(feature = "redis")]
    pub fn redis_config(&self) -> crate::backend::RedisConfig {
        crate::backend::RedisConfig {
            host: self.redis_host.clone(),
            port: self.redis_port,
            pool_size: crate::backend::RedisConfig::pool_size_from_env(),
            connection_timeout: self.backend_timeout,
            ..Default::default()
        }
    }

    #[cfg(feature = "elastic")]
    pub fn elastic_config(&self) -> crate::index::ElasticConfig {
        crate::index::ElasticConfig {
            url: self.elastic_url(),
            timeout: self.backend_timeout,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::ConfigError(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

/// Whole seconds, at least one.
fn parse_secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(lookup, key, default.as_secs())? {
        0 => Err(Error::ConfigError(format!("{}=0: must be at least 1 second", key))),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::ConfigError(format!(
            "{}={:?}: expected a boolean",
            key, raw
        ))),
    }
}
