//! Error types for appraisal-report
//!
//! This module provides the error handling for the library, including:
//! - Domain-specific error types (Credential, Export, Config, etc.)
//! - A three-way category split (configuration, transport, export) that
//!   drives how callers recover
//! - Context information (token offset, photo URL, HTTP status, etc.)

use thiserror::Error;

/// Result type alias for appraisal-report operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for appraisal-report
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "export.device_pixel_ratio")
        key: Option<String>,
    },

    /// Credential token decoding or encoding failed
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status
    #[error("HTTP status {status} from appraisal API")]
    Http {
        /// The HTTP status code of the response
        status: u16,
    },

    /// Server answered 2xx but reported a logical failure in the envelope
    #[error("API failure: {message}")]
    Api {
        /// The server-provided failure message, or a placeholder when absent
        message: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Report capture/export error
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Credential codec errors
///
/// These are configuration-grade failures: the embedded tokens are a build-time
/// invariant, so a malformed token means the build itself is broken. They are
/// never masked by a fallback record.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Token contains a character outside the key alphabet
    #[error("token character {ch:?} at offset {offset} is not in the key alphabet")]
    InvalidTokenChar {
        /// The offending character
        ch: char,
        /// Character offset within the token
        offset: usize,
    },

    /// A UTF-16 code unit cannot be represented by a 3-character group
    #[error("code unit {value} is outside the encodable range")]
    CodeUnitOutOfRange {
        /// The code unit that exceeds the positional-group capacity
        value: u16,
    },
}

/// Report export errors
///
/// Raised inside the capture pipeline and caught at its boundary; they reach
/// logs, never the caller of [`export_as_image`](crate::ReportExporter::export_as_image).
#[derive(Debug, Error)]
pub enum ExportError {
    /// Capture region has no visible area after skip filtering
    #[error("capture region {width}x{height} has no visible area")]
    EmptyRegion {
        /// Region width in layout pixels
        width: u32,
        /// Region height in layout pixels
        height: u32,
    },

    /// A photo element could not be fetched
    #[error("failed to fetch photo {url}: {reason}")]
    PhotoFetch {
        /// The photo URL that failed
        url: String,
        /// The reason the fetch failed
        reason: String,
    },

    /// A fetched photo could not be decoded as an image
    #[error("failed to decode photo {url}: {reason}")]
    PhotoDecode {
        /// The photo URL whose bytes were not a decodable image
        url: String,
        /// The reason decoding failed
        reason: String,
    },

    /// PNG encoding of the composed canvas failed
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Recovery category of an error
///
/// The three categories map one-to-one onto how the library reacts:
/// configuration errors abort construction, transport errors are absorbed by
/// the fallback record, export errors are logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fatal at construction; never masked
    Configuration,
    /// Recovered by substituting the fallback record
    Transport,
    /// Recovered by skipping the export
    Export,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Transport => write!(f, "transport"),
            ErrorCategory::Export => write!(f, "export"),
        }
    }
}

impl Error {
    /// Get the recovery category for this error
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config { .. } | Error::Credential(_) => ErrorCategory::Configuration,
            Error::Network(_) | Error::Http { .. } | Error::Api { .. } | Error::Serialization(_) => {
                ErrorCategory::Transport
            }
            Error::Export(_) | Error::Io(_) => ErrorCategory::Export,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Helpers: construct every Error variant for category tests
    // -----------------------------------------------------------------------

    /// Returns a vec of (Error, expected_category) for every reachable match
    /// arm in Error::category.
    fn all_error_variants() -> Vec<(Error, ErrorCategory)> {
        vec![
            (
                Error::Config {
                    message: "device pixel ratio must be positive".into(),
                    key: Some("export.device_pixel_ratio".into()),
                },
                ErrorCategory::Configuration,
            ),
            (
                Error::Credential(CredentialError::InvalidTokenChar { ch: '!', offset: 0 }),
                ErrorCategory::Configuration,
            ),
            (
                Error::Credential(CredentialError::CodeUnitOutOfRange { value: 50_000 }),
                ErrorCategory::Configuration,
            ),
            (Error::Http { status: 502 }, ErrorCategory::Transport),
            (
                Error::Api {
                    message: "order not found".into(),
                },
                ErrorCategory::Transport,
            ),
            (
                Error::Serialization(serde_json::from_str::<serde_json::Value>("{").unwrap_err()),
                ErrorCategory::Transport,
            ),
            (
                Error::Export(ExportError::EmptyRegion {
                    width: 0,
                    height: 240,
                }),
                ErrorCategory::Export,
            ),
            (
                Error::Export(ExportError::PhotoFetch {
                    url: "https://img.example/1.png".into(),
                    reason: "connection refused".into(),
                }),
                ErrorCategory::Export,
            ),
            (
                Error::Export(ExportError::PhotoDecode {
                    url: "https://img.example/1.png".into(),
                    reason: "unsupported image format".into(),
                }),
                ErrorCategory::Export,
            ),
            (
                Error::Io(std::io::Error::other("disk full")),
                ErrorCategory::Export,
            ),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_category() {
        for (error, expected) in all_error_variants() {
            let actual = error.category();
            assert_eq!(
                actual, expected,
                "error {error} categorized as {actual}, expected {expected}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Display formatting carries the context fields
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_display_includes_message() {
        let err = Error::Config {
            message: "output_dir is not a directory".into(),
            key: Some("export.output_dir".into()),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: output_dir is not a directory"
        );
    }

    #[test]
    fn invalid_token_char_display_names_char_and_offset() {
        let err = CredentialError::InvalidTokenChar { ch: 'x', offset: 7 };
        let msg = err.to_string();
        assert!(msg.contains("'x'"), "missing char in: {msg}");
        assert!(msg.contains("offset 7"), "missing offset in: {msg}");
    }

    #[test]
    fn code_unit_out_of_range_display_includes_value() {
        let err = CredentialError::CodeUnitOutOfRange { value: 46_656 };
        assert!(err.to_string().contains("46656"));
    }

    #[test]
    fn http_error_display_includes_status() {
        let err = Error::Http { status: 503 };
        assert_eq!(err.to_string(), "HTTP status 503 from appraisal API");
    }

    #[test]
    fn api_error_display_includes_server_message() {
        let err = Error::Api {
            message: "order expired".into(),
        };
        assert_eq!(err.to_string(), "API failure: order expired");
    }

    #[test]
    fn photo_fetch_display_names_url() {
        let err = ExportError::PhotoFetch {
            url: "https://img.example/a.jpg".into(),
            reason: "timed out".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://img.example/a.jpg"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn empty_region_display_includes_dimensions() {
        let err = ExportError::EmptyRegion {
            width: 750,
            height: 0,
        };
        assert!(err.to_string().contains("750x0"));
    }

    // -----------------------------------------------------------------------
    // From conversions wrap into the right variants
    // -----------------------------------------------------------------------

    #[test]
    fn credential_error_converts_to_configuration_category() {
        let err: Error = CredentialError::InvalidTokenChar { ch: '_', offset: 3 }.into();
        assert!(matches!(err, Error::Credential(_)));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn serde_json_error_converts_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(err.category(), ErrorCategory::Transport);
    }

    #[test]
    fn export_error_converts_to_export_category() {
        let err: Error = ExportError::EmptyRegion {
            width: 0,
            height: 0,
        }
        .into();
        assert!(matches!(err, Error::Export(_)));
        assert_eq!(err.category(), ErrorCategory::Export);
    }

    #[test]
    fn io_error_converts_to_export_category() {
        let err: Error = std::io::Error::other("permission denied").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.category(), ErrorCategory::Export);
    }

    #[test]
    fn category_display_is_lowercase() {
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
        assert_eq!(ErrorCategory::Transport.to_string(), "transport");
        assert_eq!(ErrorCategory::Export.to_string(), "export");
    }
}
