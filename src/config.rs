//! Service configuration.
//!
//! Everything the service needs at startup lives in [`ServiceConfig`], built
//! through [`ServiceConfigBuilder`]. The config is read-only once the server
//! is running: handlers see it through `Arc<AppState>` and never mutate it.

use crate::error::Pdf2MdError;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default model used for table reorganisation.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Environment variable holding the reorganizer credential.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Configuration for the pdf2md HTTP service.
///
/// # Example
/// ```rust
/// use pdf2md_service::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .port(8080)
///     .model("claude-opus-4-20250514")
///     .max_tokens(8000)
///     .build()
///     .unwrap();
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Interface to bind. Default: `0.0.0.0`.
    pub host: String,

    /// TCP port. Default: 5001.
    pub port: u16,

    /// Model identifier for the table reorganizer. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum tokens the model may generate. Default: 20000.
    ///
    /// Statements with many transaction rows produce long tables; a low cap
    /// truncates the last table mid-row.
    pub max_tokens: usize,

    /// Sampling temperature. Default: 0.0 (values must be copied verbatim).
    pub temperature: f32,

    /// Upper bound on one reorganizer call, in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Largest accepted request body in bytes. Default: 100 MiB.
    pub max_upload_bytes: usize,

    /// Directory for transient files. `None` uses the OS temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Credential for the remote reorganizer. `None` disables the stage.
    pub anthropic_api_key: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 20_000,
            temperature: 0.0,
            api_timeout_secs: 120,
            max_upload_bytes: 100 * 1024 * 1024,
            temp_dir: None,
            anthropic_api_key: None,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("temp_dir", &self.temp_dir)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Socket address assembled from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, Pdf2MdError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Pdf2MdError::InvalidConfig(format!("bad bind address: {e}")))
    }

    /// `true` when a non-empty reorganizer credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.anthropic_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Set the reorganizer credential. Empty strings count as "not set".
    pub fn anthropic_api_key(mut self, key: Option<String>) -> Self {
        self.config.anthropic_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, Pdf2MdError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(Pdf2MdError::InvalidConfig("model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(Pdf2MdError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if !(0.0..=1.0).contains(&c.temperature) {
            return Err(Pdf2MdError::InvalidConfig(format!(
                "temperature must be within 0.0–1.0, got {}",
                c.temperature
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(Pdf2MdError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(Pdf2MdError::InvalidConfig(
                "max_upload_bytes must be ≥ 1".into(),
            ));
        }
        if let Some(ref dir) = c.temp_dir {
            if !dir.is_dir() {
                return Err(Pdf2MdError::InvalidConfig(format!(
                    "temp_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        c.bind_addr()?;
        Ok(self.config)
    }
}
