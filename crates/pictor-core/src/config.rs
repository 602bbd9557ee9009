//! Configuration module
//!
//! Settings are read from the process environment (after loading an optional `.env`
//! file). Every value has a default so a local run needs nothing but a reachable
//! Postgres.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_DERIVATION_TIMEOUT_SECS, DEFAULT_MAX_UPLOAD_SIZE_MB, DEFAULT_THUMBNAIL_DIR,
    DEFAULT_THUMBNAIL_WIDTH, DEFAULT_UPLOAD_DIR,
};

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const SERVER_PORT: u16 = 8080;

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Process-level settings: HTTP listener, database pool, logging
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

/// Ingestion service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub thumbnail_dir: PathBuf,
    pub derivation_timeout_secs: u64,
    pub thumbnail_width: u32,
    pub max_upload_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().base.request_timeout_secs
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.inner().upload_dir
    }

    pub fn thumbnail_dir(&self) -> &PathBuf {
        &self.inner().thumbnail_dir
    }

    pub fn derivation_timeout_secs(&self) -> u64 {
        self.inner().derivation_timeout_secs
    }

    pub fn thumbnail_width(&self) -> u32 {
        self.inner().thumbnail_width
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }
}

/// Build a Postgres URL from discrete connection settings.
pub fn compose_database_url(
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    name: &str,
    sslmode: &str,
) -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        user, password, host, port, name, sslmode
    )
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let port = env::var("DB_PORT")
                    .unwrap_or_else(|_| "5432".to_string())
                    .parse::<u16>()
                    .unwrap_or(5432);
                compose_database_url(
                    &env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                    &env::var("DB_PASSWORD").unwrap_or_default(),
                    &env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                    port,
                    &env::var("DB_NAME").unwrap_or_else(|_| "image_service".to_string()),
                    &env::var("DB_SSLMODE").unwrap_or_else(|_| "disable".to_string()),
                )
            }
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            environment,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            log_format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
        };

        Ok(ServiceConfig {
            base,
            database_url,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            thumbnail_dir: env::var("THUMBNAIL_DIR")
                .unwrap_or_else(|_| DEFAULT_THUMBNAIL_DIR.to_string())
                .into(),
            derivation_timeout_secs: env::var("DERIVATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_DERIVATION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_DERIVATION_TIMEOUT_SECS),
            thumbnail_width: env::var("THUMBNAIL_WIDTH")
                .unwrap_or_else(|_| DEFAULT_THUMBNAIL_WIDTH.to_string())
                .parse()
                .unwrap_or(DEFAULT_THUMBNAIL_WIDTH),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("Database max connections cannot be 0"));
        }

        if self.derivation_timeout_secs == 0 {
            return Err(anyhow::anyhow!("DERIVATION_TIMEOUT_SECS must be greater than 0"));
        }

        if self.thumbnail_width == 0 {
            return Err(anyhow::anyhow!("THUMBNAIL_WIDTH must be greater than 0"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.upload_dir == self.thumbnail_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and THUMBNAIL_DIR must point to different directories"
            ));
        }

        Ok(())
    }
}
