//! # appraisal-report
//!
//! Client library for fetching, rendering, and exporting sneaker
//! authentication reports.
//!
//! ## Design Philosophy
//!
//! appraisal-report is designed to be:
//! - **Resilient** - A failed fetch still yields a displayable fallback record
//! - **Deterministic** - Credential decoding and request signing are pure and fully testable
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Explicit** - Fallible operations return `Result`, never panic
//!
//! ## Quick Start
//!
//! ```no_run
//! use appraisal_report::{AppraisalClient, Config, ReportExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = AppraisalClient::new(config.clone())?;
//!
//!     // Total: a network or server failure yields a fallback record
//!     let outcome = client.load_result("63424231").await;
//!     let report = outcome.result();
//!     println!("{} by {}", report.status, report.masked_appraiser_name());
//!
//!     let exporter = ReportExporter::new(config.export)?;
//!     if let Some(path) = exporter.export_report(report).await {
//!         println!("saved {}", path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Report fetching client
pub mod client;
/// Configuration types
pub mod config;
/// Embedded API credentials
pub mod credentials;
/// Error types
pub mod error;
/// Report capture and PNG export
pub mod export;
/// Credential token encoding
pub mod obfuscation;
/// Request signing
pub mod signing;
/// Core report types
pub mod types;

// Re-export commonly used types
pub use client::{ApiEnvelope, AppraisalClient, FetchState, LoadOutcome, resolve_order_id};
pub use config::{ApiConfig, ApiProtocol, Config, ExportConfig};
pub use credentials::CredentialPair;
pub use error::{CredentialError, Error, ErrorCategory, ExportError, Result};
pub use export::{
    CaptureRegion, ElementContent, EXPORT_QUALITY_FACTOR, RegionElement, ReportExporter,
    export_file_name,
};
pub use signing::{SignedRequest, sign};
pub use types::{
    AppraisalResult, FALLBACK_APPRAISER, ReportStatus, ResultImage, format_timestamp_ms, mask_name,
};
