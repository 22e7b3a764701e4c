//! Report fetch orchestration
//!
//! One [`AppraisalClient`] serves one report screen. It decodes the
//! credential tokens at construction, issues exactly one request per fetch
//! cycle, and guarantees the caller a renderable record: transport and API
//! failures are absorbed into a locally synthesized fallback instead of
//! propagating. Retrying is always an explicit new cycle driven by user
//! action, never something the client does on its own.

use serde::Deserialize;
use url::Url;

use crate::config::{ApiProtocol, Config};
use crate::credentials::CredentialPair;
use crate::error::{Error, Result};
use crate::signing::SignedRequest;
use crate::types::AppraisalResult;

/// User agent sent with every appraisal API request.
const USER_AGENT: &str = "appraisal-report client";

/// States of one fetch cycle
///
/// A cycle starts in `Loading` (the caller renders the placeholder while the
/// [`load_result`](AppraisalClient::load_result) future is pending) and ends
/// in exactly one of the two terminal states reported by
/// [`LoadOutcome::state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchState {
    /// A request is in flight; nothing but the placeholder may render
    Loading,
    /// The cycle ended with a server-provided record
    Success,
    /// The cycle ended with the locally synthesized fallback record
    Failure,
}

impl std::fmt::Display for FetchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchState::Loading => write!(f, "loading"),
            FetchState::Success => write!(f, "success"),
            FetchState::Failure => write!(f, "failure"),
        }
    }
}

/// Outcome of one fetch cycle
///
/// Both branches carry a renderable record; the fallback branch additionally
/// preserves the typed failure so callers can log or inspect it without the
/// error ever driving control flow.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The API answered with a report record
    Fetched(AppraisalResult),
    /// The cycle failed and a fallback record was synthesized
    Fallback {
        /// The guaranteed-renderable substitute record
        result: AppraisalResult,
        /// The failure that triggered substitution
        error: Error,
    },
}

impl LoadOutcome {
    /// The record to render, whichever branch was taken
    #[must_use]
    pub fn result(&self) -> &AppraisalResult {
        match self {
            LoadOutcome::Fetched(result) | LoadOutcome::Fallback { result, .. } => result,
        }
    }

    /// Consume the outcome, keeping only the record
    #[must_use]
    pub fn into_result(self) -> AppraisalResult {
        match self {
            LoadOutcome::Fetched(result) | LoadOutcome::Fallback { result, .. } => result,
        }
    }

    /// The terminal state this cycle reached
    #[must_use]
    pub fn state(&self) -> FetchState {
        match self {
            LoadOutcome::Fetched(_) => FetchState::Success,
            LoadOutcome::Fallback { .. } => FetchState::Failure,
        }
    }

    /// Whether the record is a locally synthesized substitute
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadOutcome::Fallback { .. })
    }

    /// The failure behind a fallback record, if any
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            LoadOutcome::Fetched(_) => None,
            LoadOutcome::Fallback { error, .. } => Some(error),
        }
    }
}

/// Wire envelope every appraisal API response arrives in
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the call succeeded logically
    pub success: bool,

    /// Server-provided failure message, present on logical failures
    #[serde(default)]
    pub msg: Option<String>,

    /// The report record, present on success
    #[serde(default)]
    pub data: Option<AppraisalResult>,
}

/// Client for the appraisal report API
///
/// The client is responsible for:
/// - Decoding the credential tokens once at construction
/// - Signing and issuing one request per fetch cycle
/// - Interpreting the response envelope
/// - Substituting the fallback record on any transport or API failure
///
/// The client never retries and never caches; the screen drives one cycle at
/// a time and each [`load_result`](Self::load_result) call is that cycle's
/// single in-flight request.
#[derive(Debug)]
pub struct AppraisalClient {
    /// HTTP client with the configured request timeout
    http: reqwest::Client,

    /// Credentials decoded from the configured tokens
    credentials: CredentialPair,

    /// Wire settings for this client
    config: Config,
}

impl AppraisalClient {
    /// Create a client from configuration
    ///
    /// The credential tokens decode immediately: credentials are a build-time
    /// invariant, so a malformed token fails construction loudly instead of
    /// surfacing mid-fetch, and no fallback record ever masks it.
    ///
    /// # Errors
    ///
    /// - [`Error::Credential`] if a configured token is malformed
    /// - [`Error::Network`] if the HTTP client cannot be created
    pub fn new(config: Config) -> Result<Self> {
        let credentials =
            CredentialPair::from_tokens(&config.api.app_id_token, &config.api.app_secret_token)?;
        let http = reqwest::Client::builder()
            .timeout(config.api.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            credentials,
            config,
        })
    }

    /// Create a client with the compiled-in default configuration
    ///
    /// # Errors
    ///
    /// Same conditions as [`new`](Self::new); with the embedded tokens a
    /// credential failure here means the build itself is broken.
    pub fn with_defaults() -> Result<Self> {
        Self::new(Config::default())
    }

    /// The decoded credentials in use
    #[must_use]
    pub fn credentials(&self) -> &CredentialPair {
        &self.credentials
    }

    /// The configuration this client was built from
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one fetch cycle for `order_id`
    ///
    /// Issues exactly one request, with no automatic retries. The outcome
    /// always carries a renderable record: any transport failure, non-2xx
    /// status, malformed body, or server-reported logical failure is logged
    /// and absorbed into [`AppraisalResult::fallback`]. This method never
    /// returns an error and never panics, so the screen can render whatever
    /// comes back without its own recovery path.
    pub async fn load_result(&self, order_id: &str) -> LoadOutcome {
        tracing::debug!(
            order_id = %order_id,
            protocol = ?self.config.api.protocol,
            "fetching appraisal result"
        );

        match self.fetch_result(order_id).await {
            Ok(result) => {
                tracing::debug!(
                    order_id = %order_id,
                    status = %result.status,
                    images = result.image_list.len(),
                    "appraisal result received"
                );
                LoadOutcome::Fetched(result)
            }
            Err(error) => {
                tracing::warn!(
                    order_id = %order_id,
                    category = %error.category(),
                    error = %error,
                    "fetch failed, substituting fallback record"
                );
                LoadOutcome::Fallback {
                    result: AppraisalResult::fallback(order_id),
                    error,
                }
            }
        }
    }

    /// Issue the request for one cycle and interpret the envelope
    async fn fetch_result(&self, order_id: &str) -> Result<AppraisalResult> {
        let request = match self.config.api.protocol {
            ApiProtocol::SignedQuery => {
                let signed = SignedRequest::issue(&self.credentials, order_id);
                // The API expects the JSON content type even on the bodyless GET
                self.http
                    .get(&self.config.api.endpoint)
                    .query(&signed.query_pairs())
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
            }
            ApiProtocol::JsonBody => self
                .http
                .post(&self.config.api.endpoint)
                .json(&serde_json::json!({ "orderId": order_id })),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;

        if !envelope.success {
            return Err(Error::Api {
                message: envelope
                    .msg
                    .unwrap_or_else(|| "unspecified server failure".to_string()),
            });
        }

        envelope.data.ok_or(Error::Api {
            message: "success envelope carried no report data".to_string(),
        })
    }
}

/// Resolve the order id for a fetch cycle from the report page URL
///
/// Reads the `id` query parameter first, then `orderId`; blank values count
/// as absent. An unparseable URL, or one carrying neither parameter,
/// resolves to `fallback` (deployments compile in
/// [`DEFAULT_ORDER_ID`](crate::config::DEFAULT_ORDER_ID) for that).
///
/// # Examples
///
/// ```
/// use appraisal_report::client::resolve_order_id;
///
/// let url = Some("https://report.example/?id=63424231");
/// assert_eq!(resolve_order_id(url, "fallback"), "63424231");
/// assert_eq!(resolve_order_id(None, "fallback"), "fallback");
/// ```
#[must_use]
pub fn resolve_order_id(page_url: Option<&str>, fallback: &str) -> String {
    let Some(raw) = page_url else {
        return fallback.to_string();
    };
    let Ok(url) = Url::parse(raw) else {
        return fallback.to_string();
    };

    for key in ["id", "orderId"] {
        if let Some((_, value)) = url.query_pairs().find(|(k, _)| k == key)
            && !value.is_empty()
        {
            return value.into_owned();
        }
    }

    fallback.to_string()
}
