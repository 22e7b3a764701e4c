//! Core types for appraisal-report

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Appraiser name substituted into locally synthesized fallback records.
pub const FALLBACK_APPRAISER: &str = "Unknown";

/// Lifecycle status of an appraisal report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Appraisal completed and the item passed
    Finish,
    /// Appraisal did not pass; also the verdict of locally synthesized
    /// fallback records
    Fail,
    /// Item judged counterfeit
    Fake,
    /// Local placeholder while a fetch is pending; never sent to or received
    /// from the API
    Loading,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Finish => write!(f, "finish"),
            ReportStatus::Fail => write!(f, "fail"),
            ReportStatus::Fake => write!(f, "fake"),
            ReportStatus::Loading => write!(f, "loading"),
        }
    }
}

/// One photograph attached to an appraisal report
///
/// Opaque pass-through from the API: presence of the fields is validated by
/// deserialization and the contents are rendered untouched, in server order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultImage {
    /// Server-side image record id
    pub id: String,

    /// Image URL
    pub image: String,

    /// Appraisal model id
    pub model_id: String,

    /// Appraisal model display name
    pub model_name: String,

    /// Order the image belongs to
    pub order_id: String,

    /// Server-side range id
    pub range_id: String,

    /// Creation timestamp in epoch milliseconds
    pub gmt_create: i64,

    /// Last modification timestamp in epoch milliseconds
    pub gmt_modified: i64,
}

/// A display-ready appraisal report record
///
/// Produced either by a successful fetch or by [`AppraisalResult::fallback`];
/// the screen holds exactly one and replaces it wholesale each fetch cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppraisalResult {
    /// The order id the report answers
    pub id: String,

    /// Verdict of the appraisal
    pub status: ReportStatus,

    /// Full name of the appraising expert
    pub appraiser_name: String,

    /// Report photographs in server-provided order
    #[serde(default)]
    pub image_list: Vec<ResultImage>,

    /// Report creation time in epoch milliseconds
    pub gmt_create: i64,
}

impl AppraisalResult {
    /// Synthesize the guaranteed-renderable record substituted when a fetch
    /// fails
    ///
    /// The record is indistinguishable in shape from a fetched one: `fail`
    /// verdict, [`FALLBACK_APPRAISER`] as the expert name, no photographs,
    /// and the current time as its creation time. The screen renders it like
    /// any other report, so a dead network can never produce a blank page.
    #[must_use]
    pub fn fallback(order_id: &str) -> Self {
        Self {
            id: order_id.to_string(),
            status: ReportStatus::Fail,
            appraiser_name: FALLBACK_APPRAISER.to_string(),
            image_list: Vec::new(),
            gmt_create: Utc::now().timestamp_millis(),
        }
    }

    /// Whether the appraisal passed
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.status == ReportStatus::Finish
    }

    /// The expert name masked for display
    #[must_use]
    pub fn masked_appraiser_name(&self) -> String {
        mask_name(&self.appraiser_name)
    }

    /// The report creation time formatted for display
    #[must_use]
    pub fn publication_date(&self) -> String {
        format_timestamp_ms(self.gmt_create)
    }
}

/// Mask a personal name for display
///
/// Keeps the first character, and the last character when the name has at
/// least three; everything between becomes `*`. One-character names pass
/// through unchanged. Counting is per character, not per byte, so non-ASCII
/// names mask correctly.
///
/// # Examples
///
/// ```
/// use appraisal_report::types::mask_name;
///
/// assert_eq!(mask_name("J"), "J");
/// assert_eq!(mask_name("Jo"), "J*");
/// assert_eq!(mask_name("Иванов"), "И****в");
/// ```
#[must_use]
pub fn mask_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    match chars.len() {
        0 | 1 => name.to_string(),
        2 => format!("{}*", chars[0]),
        len => {
            let mut masked = String::with_capacity(len);
            masked.push(chars[0]);
            for _ in 0..len - 2 {
                masked.push('*');
            }
            masked.push(chars[len - 1]);
            masked
        }
    }
}

/// Format an epoch-millisecond timestamp as an unpadded `Y-M-D H:M:S` string
///
/// Single-digit components stay single-digit (`2024-3-7 9:5:2`), the format
/// the report screen has always shown. Rendered in UTC so output does not
/// depend on the host timezone. Timestamps outside the representable range
/// render as the raw millisecond value.
#[must_use]
pub fn format_timestamp_ms(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(dt) => format!(
            "{}-{}-{} {}:{}:{}",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        None => timestamp_ms.to_string(),
    }
}

/// Build the URL the report screen's QR code points back to
///
/// Appends `id=<order id>` to the query of `base`, percent-encoding as
/// needed. The display surface renders the QR image itself; this only
/// produces the value it encodes.
///
/// # Errors
///
/// Returns [`Error::Config`] if `base` is not a parseable absolute URL.
pub fn report_share_url(base: &str, order_id: &str) -> Result<String> {
    let mut url = url::Url::parse(base).map_err(|e| Error::Config {
        message: format!("invalid share base URL {base:?}: {e}"),
        key: None,
    })?;
    url.query_pairs_mut().append_pair("id", order_id);
    Ok(url.into())
}
