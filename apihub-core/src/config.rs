use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::upstream::ServiceKind;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Server and presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub host: String,
    pub port: u16,
    /// `development`, `staging` or `production`.
    pub environment: String,
    pub version: String,
    pub debug: bool,
    /// Value expected in the `X-API-Key` header.
    pub api_key: String,
    /// Comma-separated CORS origins.
    pub allowed_origins: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "apihub".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: "development".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: false,
            api_key: "changeme".to_string(),
            allowed_origins: "*".to_string(),
        }
    }
}

impl AppSettings {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Parsed CORS origin list; an empty setting means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() { vec!["*".to_string()] } else { origins }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection settings for a single upstream API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

impl ServiceConfig {
    pub fn for_kind(kind: ServiceKind) -> Self {
        Self {
            base_url: kind.default_base_url().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_verify_tls() -> bool {
    true
}

/// Database location, reported by the health status only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 5432, name: "apihub".to_string() }
    }
}

/// Redis location, reported by the health status only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: u32,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 6379, db: 0 }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub app: AppSettings,

    /// Example TOML:
    /// [services.quotes]
    /// base_url = "https://api.quotable.io"
    /// verify_tls = false
    pub services: HashMap<String, ServiceConfig>,

    pub database: DatabaseSettings,
    pub redis: RedisSettings,
}

impl Config {
    /// Settings for `kind`, falling back to built-in defaults.
    pub fn service_config(&self, kind: ServiceKind) -> ServiceConfig {
        self.services
            .get(kind.as_str())
            .cloned()
            .unwrap_or_else(|| ServiceConfig::for_kind(kind))
    }

    pub fn upsert_service_config(&mut self, kind: ServiceKind, config: ServiceConfig) {
        self.services.insert(kind.as_str().to_string(), config);
    }

    pub fn set_verify_tls(&mut self, kind: ServiceKind, verify: bool) {
        let mut service = self.service_config(kind);
        service.verify_tls = verify;
        self.upsert_service_config(kind, service);
    }

    /// Load config from disk (or defaults on first run), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Load only the on-disk config, without environment overrides.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "apihub", "apihub")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override file values with `APP_*`, `DB_*`, `REDIS_*` and
    /// `QUOTES_VERIFY_SSL` variables resolved through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APP_NAME") {
            self.app.name = v;
        }
        if let Some(v) = lookup("APP_HOST") {
            self.app.host = v;
        }
        if let Some(v) = lookup("APP_PORT") {
            self.app.port = parse_env("APP_PORT", &v)?;
        }
        if let Some(v) = lookup("APP_ENVIRONMENT") {
            self.app.environment = v;
        }
        if let Some(v) = lookup("APP_VERSION") {
            self.app.version = v;
        }
        if let Some(v) = lookup("APP_DEBUG") {
            self.app.debug = parse_flag(&v);
        }
        if let Some(v) = lookup("APP_X_API_KEY") {
            self.app.api_key = v;
        }
        if let Some(v) = lookup("ALLOWED_ORIGINS_STR") {
            self.app.allowed_origins = v;
        }
        if let Some(v) = lookup("QUOTES_VERIFY_SSL") {
            self.set_verify_tls(ServiceKind::Quotes, parse_flag(&v));
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = parse_env("DB_PORT", &v)?;
        }
        if let Some(v) = lookup("DB_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("REDIS_HOST") {
            self.redis.host = v;
        }
        if let Some(v) = lookup("REDIS_PORT") {
            self.redis.port = parse_env("REDIS_PORT", &v)?;
        }
        if let Some(v) = lookup("REDIS_DB") {
            self.redis.db = parse_env("REDIS_DB", &v)?;
        }

        Ok(())
    }
}

/// `true`, `1` and `yes` (any case) are truthy; anything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value '{value}' for environment variable {key}"))
}
