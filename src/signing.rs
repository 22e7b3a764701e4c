//! Request signing for the appraisal API
//!
//! Signed calls carry an MD5 signature over a canonical concatenation of the
//! request fields and the shared secret, plus the millisecond timestamp the
//! signature was computed for. The server checks the signature and applies
//! its own freshness window; the client never validates staleness locally.

use chrono::Utc;

use crate::credentials::CredentialPair;

/// Compute the API signature for one request
///
/// The canonical string is
/// `appid={app_id}&orderId={order_id}&timestamp={timestamp_ms}&appSecret={app_secret}`
/// with the field order fixed. The signature is the MD5 digest of its UTF-8
/// bytes rendered as 32 uppercase hexadecimal characters.
///
/// MD5 is inherited for wire compatibility with the appraisal API and is not
/// a security-grade construction; the scheme only proves possession of the
/// shared secret.
///
/// # Examples
///
/// ```
/// use appraisal_report::signing::sign;
///
/// let sig = sign("app", "order-1", 1_700_000_000_000, "secret");
/// assert_eq!(sig, "8C78A39E6F0C7A34391943DB6E2E9028");
/// ```
#[must_use]
pub fn sign(app_id: &str, order_id: &str, timestamp_ms: i64, app_secret: &str) -> String {
    let canonical =
        format!("appid={app_id}&orderId={order_id}&timestamp={timestamp_ms}&appSecret={app_secret}");
    format!("{:X}", md5::compute(canonical.as_bytes()))
}

/// A single-use signed request
///
/// Couples the sampled timestamp with the signature computed over it, so the
/// transmitted timestamp can never drift from the signed one. Issue a fresh
/// value for every request; reusing one would replay a stale timestamp and
/// the server may reject it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    order_id: String,
    app_id: String,
    timestamp_ms: i64,
    signature: String,
}

impl SignedRequest {
    /// Sign a request for `order_id` at the current wall-clock time
    #[must_use]
    pub fn issue(credentials: &CredentialPair, order_id: &str) -> Self {
        Self::issue_at(credentials, order_id, Utc::now().timestamp_millis())
    }

    /// Sign a request for `order_id` at a caller-chosen timestamp
    ///
    /// Deterministic: the same inputs always produce the same signature.
    /// [`issue`](Self::issue) delegates here after sampling the clock.
    #[must_use]
    pub fn issue_at(credentials: &CredentialPair, order_id: &str, timestamp_ms: i64) -> Self {
        let signature = sign(
            credentials.app_id(),
            order_id,
            timestamp_ms,
            credentials.app_secret(),
        );
        Self {
            order_id: order_id.to_string(),
            app_id: credentials.app_id().to_string(),
            timestamp_ms,
            signature,
        }
    }

    /// The order id this request was signed for
    #[must_use]
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// The application id transmitted with the request
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The millisecond timestamp the signature covers
    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// The uppercase hex signature
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Query-parameter pairs in the wire order the API expects:
    /// `orderId`, `appid`, `timestamp`, `sign`.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("orderId", self.order_id.clone()),
            ("appid", self.app_id.clone()),
            ("timestamp", self.timestamp_ms.to_string()),
            ("sign", self.signature.clone()),
        ]
    }
}
