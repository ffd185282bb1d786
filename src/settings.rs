use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

use crate::constants::{DEFAULT_CLOUDINARY_API_BASE, DEFAULT_UPLOAD_FOLDER};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Taken from `APP_ENV` by `AppConfig::new`, case-insensitively.
    #[serde(skip, default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Restricted role, subject to row-level security.
    #[serde(default)]
    pub database_url: String,

    /// Elevated role that bypasses row-level security.
    #[serde(default)]
    pub privileged_database_url: String,

    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,

    #[serde(default)]
    pub cloudinary_cloud_name: String,

    #[serde(default)]
    pub cloudinary_api_key: String,

    #[serde(default)]
    pub cloudinary_api_secret: String,

    #[serde(default = "default_upload_folder")]
    pub cloudinary_upload_folder: String,

    #[serde(default = "default_cloudinary_api_base")]
    pub cloudinary_api_base: String,

    #[serde(default)]
    pub admin_password: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "AnonStreak".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_run_migrations() -> bool {
    true
}
fn default_cors_origins() -> String {
    "*".to_string()
}
fn default_upload_folder() -> String {
    DEFAULT_UPLOAD_FOLDER.to_string()
}
fn default_cloudinary_api_base() -> String {
    DEFAULT_CLOUDINARY_API_BASE.to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(Environment::with_prefix("APP").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Deployments carried over from the hosted setup still export the unprefixed names
        config.cloudinary_cloud_name = fill_or_env(
            config.cloudinary_cloud_name,
            &["NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME", "CLOUDINARY_CLOUD_NAME"],
        );
        config.cloudinary_api_key = fill_or_env(config.cloudinary_api_key, &["CLOUDINARY_API_KEY"]);
        config.cloudinary_api_secret = fill_or_env(config.cloudinary_api_secret, &["CLOUDINARY_API_SECRET"]);
        config.admin_password = fill_or_env(config.admin_password, &["ADMIN_PASSWORD"]);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.privileged_database_url.trim().is_empty() {
            errors.push("PRIVILEGED_DATABASE_URL cannot be empty");
        }
        if !self.media_host_configured() {
            errors.push("Cloudinary cloud name, API key and API secret must be set");
        }
        if self.cloudinary_upload_folder.trim().is_empty() {
            errors.push("CLOUDINARY_UPLOAD_FOLDER cannot be empty");
        }
        if url::Url::parse(&self.cloudinary_api_base).is_err() {
            errors.push("CLOUDINARY_API_BASE must be an absolute URL");
        }
        if self.admin_password.is_empty() {
            errors.push("ADMIN_PASSWORD must be set");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn media_host_configured(&self) -> bool {
        !self.cloudinary_cloud_name.trim().is_empty()
            && !self.cloudinary_api_key.trim().is_empty()
            && !self.cloudinary_api_secret.is_empty()
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_or_env(current: String, env_keys: &[&str]) -> String {
    if !current.trim().is_empty() {
        return current;
    }

    env_keys
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_default()
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("privileged_database_url", &self.privileged_database_url.redact())
            .field("run_migrations", &self.run_migrations)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_key", &self.cloudinary_api_key.redact())
            .field("cloudinary_api_secret", &self.cloudinary_api_secret.redact())
            .field("cloudinary_upload_folder", &self.cloudinary_upload_folder)
            .field("cloudinary_api_base", &self.cloudinary_api_base)
            .field("admin_password", &self.admin_password.redact())
            .finish()
    }
}
