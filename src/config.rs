use log::{info, warn};
use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use crate::error::ConfigError;
use crate::mealdb::DEFAULT_BASE_URL;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "5000";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PREFS_PATH: &str = "recipeasy_prefs.json";

/// Proxy server settings.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mealdb_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: load("RECIPEASY_HOST", DEFAULT_HOST),
            port: try_load("PORT", DEFAULT_PORT)?,
            mealdb_base_url: trim_url(load("MEALDB_BASE_URL", DEFAULT_BASE_URL)),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Terminal client settings.
pub struct ClientConfig {
    pub proxy_url: String,
    pub prefs_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            proxy_url: trim_url(load("RECIPEASY_PROXY_URL", DEFAULT_PROXY_URL)),
            prefs_path: PathBuf::from(load("RECIPEASY_PREFS", DEFAULT_PREFS_PATH)),
        }
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn load(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    load(key, default).parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }
    })
}
