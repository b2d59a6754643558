//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;

/// Environment variable holding the fal.ai API key.
pub const FAL_KEY_VAR: &str = "FAL_KEY";
/// Environment variable holding the ImageKit public key.
pub const IMAGEKIT_PUBLIC_KEY_VAR: &str = "IMAGEKIT_PUBLIC_KEY";
/// Environment variable holding the ImageKit private key.
pub const IMAGEKIT_PRIVATE_KEY_VAR: &str = "IMAGEKIT_PRIVATE_KEY";

/// Default fal.ai Imagen4 endpoint.
pub const DEFAULT_FAL_API_URL: &str = "https://fal.run/fal-ai/imagen4/preview/ultra";
/// Default ImageKit upload endpoint.
pub const DEFAULT_IMAGEKIT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";
/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;
/// Default cap on downloaded image size (50 MiB).
pub const DEFAULT_IMAGE_MAX_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// Credentials are optional here. Their absence is reported as a startup
/// warning and becomes an error only when a client needs them.
#[derive(Clone)]
pub struct Config {
    /// fal.ai API key
    pub fal_key: Option<String>,
    /// ImageKit public key, sent as a form field
    pub imagekit_public_key: Option<String>,
    /// ImageKit private key, sent as the Basic auth username
    pub imagekit_private_key: Option<String>,
    /// Generation endpoint
    pub fal_api_url: String,
    /// Hosting upload endpoint
    pub imagekit_upload_url: String,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout_secs: u64,
    /// Maximum accepted size of a downloaded image
    pub image_max_bytes: usize,
}

/// Borrowed ImageKit key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageKitCredentials<'a> {
    pub public_key: &'a str,
    pub private_key: &'a str,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if a numeric setting cannot be parsed.
    /// Missing credentials never fail here.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty and whitespace-only values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_positive("HTTP_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let image_max_bytes = match get("IMAGE_MAX_BYTES") {
            Some(raw) => parse_positive("IMAGE_MAX_BYTES", &raw)?,
            None => DEFAULT_IMAGE_MAX_BYTES,
        };

        Ok(Self {
            fal_key: get(FAL_KEY_VAR),
            imagekit_public_key: get(IMAGEKIT_PUBLIC_KEY_VAR),
            imagekit_private_key: get(IMAGEKIT_PRIVATE_KEY_VAR),
            fal_api_url: get("FAL_API_URL").unwrap_or_else(|| DEFAULT_FAL_API_URL.to_string()),
            imagekit_upload_url: get("IMAGEKIT_UPLOAD_URL")
                .unwrap_or_else(|| DEFAULT_IMAGEKIT_UPLOAD_URL.to_string()),
            http_timeout_secs,
            image_max_bytes,
        })
    }

    /// Names of credential variables that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.fal_key.is_none() {
            missing.push(FAL_KEY_VAR);
        }
        if self.imagekit_public_key.is_none() {
            missing.push(IMAGEKIT_PUBLIC_KEY_VAR);
        }
        if self.imagekit_private_key.is_none() {
            missing.push(IMAGEKIT_PRIVATE_KEY_VAR);
        }
        missing
    }

    /// The fal.ai key, or a configuration error if it was never supplied.
    pub fn require_fal_key(&self) -> Result<&str, ConfigError> {
        self.fal_key
            .as_deref()
            .ok_or_else(|| ConfigError::missing_env_var(FAL_KEY_VAR))
    }

    /// Both ImageKit keys, or a configuration error naming every missing one.
    pub fn require_imagekit_credentials(&self) -> Result<ImageKitCredentials<'_>, ConfigError> {
        match (
            self.imagekit_public_key.as_deref(),
            self.imagekit_private_key.as_deref(),
        ) {
            (Some(public_key), Some(private_key)) => Ok(ImageKitCredentials {
                public_key,
                private_key,
            }),
            (public, private) => {
                let mut missing = Vec::new();
                if public.is_none() {
                    missing.push(IMAGEKIT_PUBLIC_KEY_VAR);
                }
                if private.is_none() {
                    missing.push(IMAGEKIT_PRIVATE_KEY_VAR);
                }
                Err(ConfigError::missing_env_var(missing.join(", ")))
            }
        }
    }
}

fn parse_positive<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialOrd,
    T::Err: std::fmt::Display,
{
    let value: T = raw
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_value(name, e.to_string()))?;
    if value <= T::default() {
        return Err(ConfigError::invalid_value(name, "must be greater than zero"));
    }
    Ok(value)
}

// Keys are redacted so the config can be logged safely.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("Config")
            .field("fal_key", &redact(&self.fal_key))
            .field("imagekit_public_key", &redact(&self.imagekit_public_key))
            .field("imagekit_private_key", &redact(&self.imagekit_private_key))
            .field("fal_api_url", &self.fal_api_url)
            .field("imagekit_upload_url", &self.imagekit_upload_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("image_max_bytes", &self.image_max_bytes)
            .finish()
    }
}
