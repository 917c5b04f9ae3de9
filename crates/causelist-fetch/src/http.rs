//! HTTPS client for `caseDetails.jsp`.

use std::time::Duration;

use async_trait::async_trait;
use causelist_core::{CaseIdentifier, CaseRecord, RecordError};
use thiserror::Error;
use tracing::debug;

/// Case-detail endpoint; the encoded case number is appended directly.
pub const DEFAULT_BASE_URL: &str = "https://services.tshc.gov.in/Hcdbs/caseDetails.jsp?casedet=";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("malformed case details: {0}")]
    Payload(#[from] RecordError),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.is_timeout())
    }
}

/// Anything that can produce a case record for a case number.
///
/// A failure is final for the run; callers do not retry.
#[async_trait]
pub trait CaseSource: Send + Sync {
    async fn fetch(&self, case_no: &CaseIdentifier) -> Result<CaseRecord, FetchError>;
}

/// Case-detail client with certificate verification against the bundled
/// webpki roots and a per-request timeout.
pub struct CaseClient {
    client: reqwest::Client,
    base_url: String,
}

impl CaseClient {
    /// Create a client for `base_url` (everything up to and including
    /// `casedet=`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(true)
            .timeout(timeout)
            .user_agent(concat!("causelist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full request URL for a case number.
    pub fn case_url(&self, case_no: &CaseIdentifier) -> String {
        format!("{}{}", self.base_url, case_no.url_encoded())
    }
}

#[async_trait]
impl CaseSource for CaseClient {
    async fn fetch(&self, case_no: &CaseIdentifier) -> Result<CaseRecord, FetchError> {
        let url = self.case_url(case_no);
        debug!(url = %url, "fetching case details");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        Ok(CaseRecord::from_json(&body)?)
    }
}
