//! Configuration module
//!
//! Server and storage settings are read from the environment (a `.env` file is
//! honoured via dotenvy) and validated up front so misconfiguration fails fast.

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_LOCAL_STORAGE_PATH: &str = "./data/blobs";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// `compact` (default) or `json`
    pub log_format: String,
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_public_base_url: Option<String>,
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port: u16 = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Local,
        };

        let local_storage_base_url = env::var("LOCAL_STORAGE_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/blobs", server_port));

        let config = Config {
            server_port,
            environment,
            cors_origins,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string())
                .to_lowercase(),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_public_base_url: env::var("S3_PUBLIC_BASE_URL").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
        };

        Ok(config)
    }

    /// Config for a local filesystem backend, used by tests and the CLI.
    pub fn local(local_storage_path: impl Into<String>, base_url: impl Into<String>) -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            log_format: "compact".to_string(),
            storage_backend: StorageBackend::Local,
            local_storage_path: local_storage_path.into(),
            local_storage_base_url: base_url.into(),
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_public_base_url: None,
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
                // The write credential is mandatory: without it every intake fails.
                if self.aws_access_key_id.is_none() || self.aws_secret_access_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!("LOCAL_STORAGE_PATH must not be empty"));
                }
                if !self.local_storage_base_url.starts_with("http://")
                    && !self.local_storage_base_url.starts_with("https://")
                {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be an http(s) URL"
                    ));
                }
            }
        }

        if self.log_format != "compact" && self.log_format != "json" {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'compact' or 'json'"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Bucket region, falling back to the generic AWS region.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_is_valid() {
        let config = Config::local("/tmp/blobs", "http://localhost:3000/blobs");
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let mut config = Config::local("/tmp/blobs", "http://localhost:3000/blobs");
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.cors_origins = vec!["https://gemquote.example".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn s3_requires_write_credential() {
        let mut config = Config::local("/tmp/blobs", "http://localhost:3000/blobs");
        config.storage_backend = StorageBackend::S3;
        config.s3_bucket = Some("intake".to_string());
        config.aws_region = Some("eu-west-1".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("AWS_ACCESS_KEY_ID"));

        config.aws_access_key_id = Some("key".to_string());
        config.aws_secret_access_key = Some("secret".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.s3_region(), Some("eu-west-1"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut config = Config::local("/tmp/blobs", "http://localhost:3000/blobs");
        config.log_format = "pretty".to_string();
        assert!(config.validate().is_err());
    }
}
