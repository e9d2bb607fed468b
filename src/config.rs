use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::error::AppError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost";

pub const BASE_URL_ENV: &str = "API_HAVEN_BASE_URL";
pub const ORIGIN_ENV: &str = "API_HAVEN_ORIGIN";

/// Optional overrides read from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub api_base_url: Option<String>,
    pub origin: Option<String>,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the collections backend.
    pub api_base_url: Url,
    /// Base that relative request URLs resolve against.
    pub origin: Url,
    /// Where local snapshots live.
    pub data_dir: PathBuf,
}

fn config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("api-haven").join("config.toml")
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("api-haven")
}

/// Empty strings count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// File, then environment. A missing file is not an error.
    pub fn load() -> Result<Self, AppError> {
        let path = config_path();
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<ConfigFile>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConfigFile::default(),
            Err(e) => return Err(e.into()),
        };
        Self::from_sources(file, std::env::var(BASE_URL_ENV).ok(), std::env::var(ORIGIN_ENV).ok())
    }

    pub fn from_sources(
        file: ConfigFile,
        env_base_url: Option<String>,
        env_origin: Option<String>,
    ) -> Result<Self, AppError> {
        let base = non_empty(env_base_url)
            .or(non_empty(file.api_base_url))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let origin = non_empty(env_origin)
            .or(non_empty(file.origin))
            .unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        Ok(Self {
            api_base_url: Url::parse(base.trim())?,
            origin: Url::parse(origin.trim())?,
            data_dir: file.data_dir.unwrap_or_else(default_data_dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::from_sources(ConfigFile::default(), None, None).unwrap();
        assert_eq!(cfg.api_base_url.as_str(), "http://localhost:4000/api");
        assert_eq!(cfg.origin.as_str(), "http://localhost/");
    }

    #[test]
    fn test_env_beats_file_and_blank_env_is_ignored() {
        let file: ConfigFile = toml::from_str(
            r#"
            api_base_url = "http://file.test/api"
            data_dir = "/tmp/haven"
            "#,
        )
        .unwrap();
        let cfg = Config::from_sources(file.clone(), Some("http://env.test/v2".into()), None).unwrap();
        assert_eq!(cfg.api_base_url.as_str(), "http://env.test/v2");
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/haven"));

        let cfg = Config::from_sources(file, Some("  ".into()), None).unwrap();
        assert_eq!(cfg.api_base_url.as_str(), "http://file.test/api");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Config::from_sources(ConfigFile::default(), Some("not a url".into()), None).unwrap_err();
        assert!(matches!(err, AppError::Url(_)));
    }
}
