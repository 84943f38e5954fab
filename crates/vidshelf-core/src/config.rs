//! Configuration module
//!
//! Settings are read once at startup from the process environment (after loading
//! an optional `.env` file) and validated before any connection is opened.

use std::env;
use std::str::FromStr;

use crate::admission::{
    AdmissionMode, AdmissionPolicy, DEFAULT_MAX_STORAGE_CAPACITY, DEFAULT_MAX_UPLOAD_SIZE,
};

const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_URL_TTL_SECS: u64 = 15 * 60;
const POSTGRES_HOST: &str = "db";
const POSTGRES_PORT: u16 = 5432;
const S3_REGION: &str = "auto";

/// Origin every deployment accepts, matching the default frontend dev server.
pub const LOCAL_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Object storage (Cloudflare R2 or any S3-compatible provider)
    pub r2_account_id: Option<String>,
    pub r2_access_key_id: Option<String>,
    pub r2_secret_access_key: Option<String>,
    pub r2_bucket_name: String,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    /// Base URL under which uploaded objects are publicly reachable, without a
    /// trailing slash.
    pub public_domain: Option<String>,
    // Upload admission
    pub max_upload_size_bytes: u64,
    pub max_storage_capacity_bytes: u64,
    pub upload_url_ttl_seconds: u64,
    pub admission_mode: AdmissionMode,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = var("PORT")
            .unwrap_or_else(|| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => {
                let user = var("POSTGRES_USER").ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_URL or POSTGRES_USER must be set")
                })?;
                let password = var("POSTGRES_PASSWORD").unwrap_or_default();
                let db_name = var("POSTGRES_DB").unwrap_or_else(|| user.clone());
                let host = var("POSTGRES_HOST").unwrap_or_else(|| POSTGRES_HOST.to_string());
                let port: u16 = parse_number(var("POSTGRES_PORT"), "POSTGRES_PORT", POSTGRES_PORT)?;
                format!(
                    "postgresql://{}:{}@{}:{}/{}",
                    user, password, host, port, db_name
                )
            }
        };

        let mut cors_origins = vec![LOCAL_FRONTEND_ORIGIN.to_string()];
        let extra_origins = var("CORS_ORIGINS")
            .into_iter()
            .flat_map(|s| {
                s.split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .collect::<Vec<_>>()
            })
            .chain(var("FRONTEND_URL").map(|u| u.trim().trim_end_matches('/').to_string()));
        for origin in extra_origins {
            if !origin.is_empty() && !cors_origins.contains(&origin) {
                cors_origins.push(origin);
            }
        }

        let admission_mode = match var("ADMISSION_MODE") {
            Some(mode) => mode.parse::<AdmissionMode>().map_err(|e: String| anyhow::anyhow!(e))?,
            None => AdmissionMode::default(),
        };

        let config = Config {
            server_port,
            environment,
            cors_origins,
            database_url,
            db_max_connections: parse_number(
                var("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                MAX_CONNECTIONS,
            )?,
            db_timeout_seconds: parse_number(
                var("DB_TIMEOUT_SECONDS"),
                "DB_TIMEOUT_SECONDS",
                CONNECTION_TIMEOUT_SECS,
            )?,
            r2_account_id: var("R2_ACCOUNT_ID"),
            r2_access_key_id: var("R2_ACCESS_KEY_ID"),
            r2_secret_access_key: var("R2_SECRET_ACCESS_KEY"),
            r2_bucket_name: var("R2_BUCKET_NAME")
                .or_else(|| var("S3_BUCKET"))
                .ok_or_else(|| anyhow::anyhow!("R2_BUCKET_NAME must be set"))?,
            s3_endpoint: var("S3_ENDPOINT"),
            s3_region: var("S3_REGION").unwrap_or_else(|| S3_REGION.to_string()),
            public_domain: var("PUBLIC_DOMAIN").map(|d| d.trim().trim_end_matches('/').to_string()),
            max_upload_size_bytes: parse_number(
                var("MAX_UPLOAD_SIZE_BYTES"),
                "MAX_UPLOAD_SIZE_BYTES",
                DEFAULT_MAX_UPLOAD_SIZE,
            )?,
            max_storage_capacity_bytes: parse_number(
                var("MAX_STORAGE_CAPACITY_BYTES"),
                "MAX_STORAGE_CAPACITY_BYTES",
                DEFAULT_MAX_STORAGE_CAPACITY,
            )?,
            upload_url_ttl_seconds: parse_number(
                var("UPLOAD_URL_TTL_SECONDS"),
                "UPLOAD_URL_TTL_SECONDS",
                UPLOAD_URL_TTL_SECS,
            )?,
            admission_mode,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.s3_endpoint.is_none() && self.r2_account_id.is_none() {
            return Err(anyhow::anyhow!(
                "R2_ACCOUNT_ID must be set when S3_ENDPOINT is not provided"
            ));
        }

        if self.r2_access_key_id.is_some() != self.r2_secret_access_key.is_some() {
            return Err(anyhow::anyhow!(
                "R2_ACCESS_KEY_ID and R2_SECRET_ACCESS_KEY must be set together"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES must be greater than 0"));
        }

        // Sizes are stored as BIGINT
        if i64::try_from(self.max_storage_capacity_bytes).is_err() {
            return Err(anyhow::anyhow!(
                "MAX_STORAGE_CAPACITY_BYTES cannot exceed {}",
                i64::MAX
            ));
        }

        if self.max_upload_size_bytes > self.max_storage_capacity_bytes {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_BYTES cannot exceed MAX_STORAGE_CAPACITY_BYTES"
            ));
        }

        // S3 presigned URLs are valid for at most seven days
        if self.upload_url_ttl_seconds == 0 || self.upload_url_ttl_seconds > 7 * 24 * 3600 {
            return Err(anyhow::anyhow!(
                "UPLOAD_URL_TTL_SECONDS must be between 1 and 604800"
            ));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Endpoint for the object storage client: the explicit override, or the
    /// account-scoped R2 endpoint.
    pub fn storage_endpoint(&self) -> Option<String> {
        self.s3_endpoint.clone().or_else(|| {
            self.r2_account_id
                .as_ref()
                .map(|account| format!("https://{}.r2.cloudflarestorage.com", account))
        })
    }

    pub fn admission_policy(&self) -> AdmissionPolicy {
        AdmissionPolicy::new(self.max_upload_size_bytes, self.max_storage_capacity_bytes)
    }
}

/// Parse a numeric setting, falling back to `default` only when it is unset.
fn parse_number<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, anyhow::Error> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
