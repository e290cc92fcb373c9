use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use url::Url;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://pylearn.db?mode=rwc";
pub const DEFAULT_PISTON_API_URL: &str = "https://emkc.org/api/v2/piston/execute";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStoreKind {
    Sqlite,
    Memory,
}

impl std::str::FromStr for ResultStoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown result store '{}', expected sqlite or memory", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub result_store: ResultStoreKind,
    pub quiz_catalog_path: Option<PathBuf>,
    pub piston_api_url: String,
    pub piston_language: String,
    pub piston_version: String,
    pub piston_timeout_secs: u64,
    pub run_code_rps: u32,
    pub cors_origins: Vec<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            result_store: ResultStoreKind::Sqlite,
            quiz_catalog_path: None,
            piston_api_url: DEFAULT_PISTON_API_URL.to_string(),
            piston_language: "python".to_string(),
            piston_version: "3.10.0".to_string(),
            piston_timeout_secs: 30,
            run_code_rps: 5,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        let piston_api_url = get_env_or("PISTON_API_URL", &defaults.piston_api_url);
        Url::parse(&piston_api_url)
            .map_err(|e| Error::Config(format!("Invalid value for PISTON_API_URL: {}", e)))?;

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.cors_origins,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", &defaults.server_address),
            database_url: get_env_or("DATABASE_URL", &defaults.database_url),
            result_store: get_env_parse_or("RESULT_STORE", defaults.result_store)?,
            quiz_catalog_path: env::var("QUIZ_CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            piston_api_url,
            piston_language: get_env_or("PISTON_LANGUAGE", &defaults.piston_language),
            piston_version: get_env_or("PISTON_VERSION", &defaults.piston_version),
            piston_timeout_secs: get_env_parse_or("PISTON_TIMEOUT_SECS", defaults.piston_timeout_secs)?,
            run_code_rps: get_env_parse_or("RUN_CODE_RPS", defaults.run_code_rps)?,
            cors_origins,
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    get_config()
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_store_kind_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<ResultStoreKind>(), Ok(ResultStoreKind::Sqlite));
        assert_eq!(" memory ".parse::<ResultStoreKind>(), Ok(ResultStoreKind::Memory));
        assert!("redis".parse::<ResultStoreKind>().is_err());
    }

    #[test]
    fn defaults_match_the_original_backend() {
        let config = Config::default();
        assert_eq!(config.server_address, "0.0.0.0:5000");
        assert_eq!(config.piston_language, "python");
        assert_eq!(config.piston_version, "3.10.0");
        assert_eq!(config.cors_origins.len(), 2);
    }
}
