//! # Portal Configuration
//!
//! Unified configuration for the portal runtime.
//!
//! ## Security Requirements
//!
//! - `hmac_secret` MUST NOT be the default zero value in production
//! - An operator token must be configured; without one no request can pass
//!   the session gate

use std::path::PathBuf;

use agp_envelope::CodecConfig;
use shared_types::Timestamp;

/// Complete portal configuration.
#[derive(Debug, Clone, Default)]
pub struct PortalConfig {
    /// Security configuration.
    pub security: SecurityConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// HTTP configuration.
    pub http: HttpConfig,
    /// Operator session configuration.
    pub session: SessionConfig,
}

impl PortalConfig {
    /// Load configuration from `AGP_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("AGP_HMAC_SECRET") {
            config.security.hmac_secret = parse_secret(&raw);
        }
        if let Ok(raw) = std::env::var("AGP_PAYLOAD_MAX_AGE_SECS") {
            let secs: Timestamp = raw.parse().map_err(|_| ConfigError::InvalidValue {
                variable: "AGP_PAYLOAD_MAX_AGE_SECS",
                message: format!("'{}' is not an integer", raw),
            })?;
            // Zero disables the freshness window entirely.
            config.security.max_payload_age_secs = (secs > 0).then_some(secs);
        }
        if let Ok(raw) = std::env::var("AGP_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(raw);
        }
        if let Ok(raw) = std::env::var("AGP_HTTP_PORT") {
            config.http.port = raw.parse().map_err(|_| ConfigError::InvalidValue {
                variable: "AGP_HTTP_PORT",
                message: format!("'{}' is not a port number", raw),
            })?;
        }
        if let Ok(raw) = std::env::var("AGP_OPERATOR_TOKEN") {
            config.session.operator_token = Some(raw);
        }
        if let Ok(raw) = std::env::var("AGP_OPERATOR_NAME") {
            config.session.operator_name = raw;
        }
        if let Ok(raw) = std::env::var("AGP_SESSION_TTL_SECS") {
            config.session.session_ttl_secs =
                raw.parse().map_err(|_| ConfigError::InvalidValue {
                    variable: "AGP_SESSION_TTL_SECS",
                    message: format!("'{}' is not an integer", raw),
                })?;
        }

        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the HMAC secret is the default zero value
    /// - no operator token is configured
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.security.hmac_secret == [0u8; 32] {
            return Err(ConfigError::InsecureHmacSecret);
        }
        if self.session.operator_token.is_none() {
            return Err(ConfigError::MissingOperatorToken);
        }
        Ok(())
    }

    /// The codec configuration derived from the security section.
    pub fn codec_config(&self) -> CodecConfig {
        let mut codec = CodecConfig::new(self.security.hmac_secret)
            .with_max_future_skew(self.security.max_future_skew_secs);
        if let Some(age) = self.security.max_payload_age_secs {
            codec = codec.with_max_payload_age(age);
        }
        codec
    }
}

/// Parse a secret string: 64 hex characters are taken as the raw 32-byte
/// key; anything else is hashed down to one.
fn parse_secret(raw: &str) -> [u8; 32] {
    if raw.len() == 64 {
        if let Ok(bytes) = hex::decode(raw) {
            let mut key = [0u8; 32];
            key.copy_from_slice(&bytes);
            return key;
        }
    }
    CodecConfig::from_secret_str(raw).secret
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// HMAC secret is not set (zero value).
    InsecureHmacSecret,
    /// No operator token configured.
    MissingOperatorToken,
    /// An environment variable held an unparseable value.
    InvalidValue {
        variable: &'static str,
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InsecureHmacSecret => {
                write!(
                    f,
                    "SECURITY VIOLATION: HMAC secret is default zero value. \
                     Set the AGP_HMAC_SECRET environment variable."
                )
            }
            ConfigError::MissingOperatorToken => {
                write!(
                    f,
                    "No operator token configured. Set AGP_OPERATOR_TOKEN; without it \
                     every request fails the session gate."
                )
            }
            ConfigError::InvalidValue { variable, message } => {
                write!(f, "Invalid value for {}: {}", variable, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Security configuration.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC secret for envelope signing (32 bytes).
    /// MUST NOT be default in production.
    pub hmac_secret: [u8; 32],
    /// Maximum accepted payload age; `None` disables the window.
    pub max_payload_age_secs: Option<Timestamp>,
    /// Tolerated clock skew for future-dated payloads.
    pub max_future_skew_secs: Timestamp,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            hmac_secret: [0u8; 32], // MUST be overridden in production
            max_payload_age_secs: Some(86_400),
            max_future_skew_secs: 10,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Data directory for the record store.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// HTTP configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Listening port for the dispatch surface.
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Operator session configuration. Session issuance is out of scope; the
/// runtime registers one static operator session at startup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bearer token accepted by the session gate.
    pub operator_token: Option<String>,
    /// Actor recorded in the activity log for this operator.
    pub operator_name: String,
    /// Session lifetime from process start.
    pub session_ttl_secs: Timestamp,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            operator_token: None,
            operator_name: "operator".to_string(),
            session_ttl_secs: 30 * 86_400,
        }
    }
}
