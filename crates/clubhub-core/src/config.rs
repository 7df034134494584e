//! Configuration module
//!
//! Settings for the admin client: where the club API lives, how to authenticate
//! against it, and which object storage backend receives uploaded assets.

use std::env;

use crate::constants::DEFAULT_API_VERSION;
use crate::storage_types::StorageBackend;

const MAX_UPLOAD_SIZE_MB: usize = 10;
const UPLOAD_CHUNK_SIZE_KB: usize = 5 * 1024;
const HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_IMAGE_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp,image/avif,image/svg+xml";

/// Admin client configuration
#[derive(Clone, Debug)]
pub struct ClubhubConfig {
    pub environment: String,
    // Club REST API
    pub api_url: String,
    pub api_version: String,
    pub api_key: Option<String>,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, Spaces)
    pub aws_region: Option<String>,
    pub public_asset_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload limits
    pub max_upload_size_bytes: usize,
    pub allowed_image_types: Vec<String>,
    pub upload_chunk_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ClubhubConfig>);

impl Config {
    fn inner(&self) -> &ClubhubConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ClubhubConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn api_url(&self) -> &str {
        &self.inner().api_url
    }

    /// Versioned API prefix, e.g. `/api/v1`.
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.inner().api_version)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.inner().api_key.as_deref()
    }

    pub fn api_token(&self) -> Option<&str> {
        self.inner().api_token.as_deref()
    }

    pub fn http_timeout_secs(&self) -> u64 {
        self.inner().http_timeout_secs
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn public_asset_base_url(&self) -> Option<&str> {
        self.inner().public_asset_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn allowed_image_types(&self) -> &[String] {
        &self.inner().allowed_image_types
    }

    pub fn upload_chunk_size_bytes(&self) -> usize {
        self.inner().upload_chunk_size_bytes
    }
}

impl ClubhubConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let upload_chunk_size_kb = lookup("UPLOAD_CHUNK_SIZE_KB")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|kb| *kb > 0)
            .unwrap_or(UPLOAD_CHUNK_SIZE_KB);

        let allowed_image_types = lookup("ALLOWED_IMAGE_TYPES")
            .unwrap_or_else(|| DEFAULT_IMAGE_TYPES.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(ClubhubConfig {
            environment,
            api_url: lookup("CLUBHUB_API_URL")
                .or_else(|| lookup("API_URL"))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_version: lookup("CLUBHUB_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            api_key: lookup("CLUBHUB_API_KEY").or_else(|| lookup("API_KEY")),
            api_token: lookup("CLUBHUB_TOKEN"),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
            public_asset_base_url: lookup("PUBLIC_ASSET_BASE_URL"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            allowed_image_types,
            upload_chunk_size_bytes: upload_chunk_size_kb * 1024,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "CLUBHUB_API_URL must start with http:// or https://"
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set for the s3 backend"));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for the s3 backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
