//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SABRIAZ_API_BASE_URL` - Backend REST API (default: <https://sabriaz-backend.onrender.com>)
//! - `SABRIAZ_SITE_URL` - Public storefront URL used in the sitemap (default: <https://sabriaz.com>)
//! - `SABRIAZ_STORAGE_DIR` - Directory for persisted cart/session state (default: `.sabriaz`)
//! - `SABRIAZ_WHATSAPP_PHONE` - WhatsApp number for the contact link, digits only (default: 923399650031)
//! - `CLOUDINARY_CLOUD_NAME` - Asset host cloud name (required together with the preset)
//! - `CLOUDINARY_UPLOAD_PRESET` - Unsigned upload preset (required together with the cloud name)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://sabriaz-backend.onrender.com";
const DEFAULT_SITE_URL: &str = "https://sabriaz.com";
const DEFAULT_STORAGE_DIR: &str = ".sabriaz";
const DEFAULT_WHATSAPP_PHONE: &str = "923399650031";
const UPLOAD_HOST: &str = "https://api.cloudinary.com/v1_1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend REST API root
    pub api_base_url: Url,
    /// Public site root, used for sitemap entries
    pub site_url: Url,
    /// Where durable key-value state is written
    pub storage_dir: PathBuf,
    /// WhatsApp number in international format without `+`
    pub whatsapp_phone: String,
    /// Asset upload settings, absent when uploads are not configured
    pub uploads: Option<UploadConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Third-party asset host settings.
///
/// Implements `Debug` manually to redact the preset.
#[derive(Clone)]
pub struct UploadConfig {
    /// Cloud (account) name on the asset host
    pub cloud_name: String,
    /// Unsigned upload preset
    pub upload_preset: SecretString,
    /// Image upload endpoint derived from the cloud name
    pub endpoint: Url,
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("cloud_name", &self.cloud_name)
            .field("upload_preset", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if only
    /// half of the upload settings are provided.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_base_url = parse_url(
            "SABRIAZ_API_BASE_URL",
            &get_or("SABRIAZ_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let site_url = parse_url("SABRIAZ_SITE_URL", &get_or("SABRIAZ_SITE_URL", DEFAULT_SITE_URL))?;
        let storage_dir = PathBuf::from(get_or("SABRIAZ_STORAGE_DIR", DEFAULT_STORAGE_DIR));

        let whatsapp_phone = get_or("SABRIAZ_WHATSAPP_PHONE", DEFAULT_WHATSAPP_PHONE);
        if whatsapp_phone.is_empty() || !whatsapp_phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "SABRIAZ_WHATSAPP_PHONE".to_string(),
                "must contain digits only".to_string(),
            ));
        }

        let uploads = UploadConfig::from_lookup(&lookup)?;

        Ok(Self {
            api_base_url,
            site_url,
            storage_dir,
            whatsapp_phone,
            uploads,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

impl UploadConfig {
    /// Build upload settings for a cloud name and preset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the cloud name cannot form a URL.
    pub fn new(cloud_name: &str, upload_preset: SecretString) -> Result<Self, ConfigError> {
        let endpoint = parse_url(
            "CLOUDINARY_CLOUD_NAME",
            &format!("{UPLOAD_HOST}/{}/image/upload", urlencoding::encode(cloud_name)),
        )?;
        Ok(Self {
            cloud_name: cloud_name.to_string(),
            upload_preset,
            endpoint,
        })
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        match (lookup("CLOUDINARY_CLOUD_NAME"), lookup("CLOUDINARY_UPLOAD_PRESET")) {
            (None, None) => Ok(None),
            (Some(cloud), Some(preset)) => Self::new(&cloud, SecretString::from(preset)).map(Some),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "CLOUDINARY_UPLOAD_PRESET".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(
                "CLOUDINARY_CLOUD_NAME".to_string(),
            )),
        }
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
