//! Configuration types for appraisal-report

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::credentials;

/// Production appraisal API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.puresnake.com/v3/appraise/order";

/// Order id assumed when the report page URL carries none.
pub const DEFAULT_ORDER_ID: &str = "63424231";

/// Which wire variant the client speaks to the appraisal API
///
/// The variants are alternatives, never merged: a request is either signed
/// and parameterized through the query string, or unsigned with a JSON body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiProtocol {
    /// Authoritative profile: GET with `orderId`, `appid`, `timestamp` and
    /// `sign` query parameters
    #[default]
    SignedQuery,
    /// Legacy profile: POST with an unsigned `{"orderId": ...}` body
    JsonBody,
}

/// API wire configuration (endpoint, protocol profile, credentials, timeout)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Appraisal API endpoint (default: the production order endpoint)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Wire variant used for report fetches
    #[serde(default)]
    pub protocol: ApiProtocol,

    /// Obfuscated application id token (default: the compiled-in token)
    #[serde(default = "default_app_id_token")]
    pub app_id_token: String,

    /// Obfuscated application secret token (default: the compiled-in token)
    #[serde(default = "default_app_secret_token")]
    pub app_secret_token: String,

    /// Request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Order id assumed when the page URL does not carry one
    #[serde(default = "default_order_id")]
    pub default_order_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            protocol: ApiProtocol::default(),
            app_id_token: default_app_id_token(),
            app_secret_token: default_app_secret_token(),
            request_timeout: default_request_timeout(),
            default_order_id: default_order_id(),
        }
    }
}

/// Report export configuration (output location, raster scale)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory PNG exports are written into (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Device pixel ratio of the rendering surface (default: 1.0)
    ///
    /// The capture raster is scaled by this ratio times the fixed quality
    /// factor, so a ratio of 2.0 produces a 4x capture.
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f32,

    /// Timeout for fetching each report photo (default: 30 seconds)
    #[serde(default = "default_photo_timeout", with = "duration_serde")]
    pub photo_timeout: Duration,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            device_pixel_ratio: default_device_pixel_ratio(),
            photo_timeout: default_photo_timeout(),
        }
    }
}

/// Main configuration for the appraisal report client
///
/// Fields are organized into logical sub-configs:
/// - [`api`](ApiConfig) — endpoint, protocol profile, credential tokens
/// - [`export`](ExportConfig) — capture output directory and scale
///
/// Both sub-configs are flattened for serialization, so the JSON format has
/// no nesting and every field is optional with a compiled-in default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// API wire settings
    #[serde(flatten)]
    pub api: ApiConfig,

    /// Report export settings
    #[serde(flatten)]
    pub export: ExportConfig,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_app_id_token() -> String {
    credentials::APP_ID_TOKEN.to_string()
}

fn default_app_secret_token() -> String {
    credentials::APP_SECRET_TOKEN.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_order_id() -> String {
    DEFAULT_ORDER_ID.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_device_pixel_ratio() -> f32 {
    1.0
}

fn default_photo_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
