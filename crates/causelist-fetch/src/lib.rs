//! Remote case-detail retrieval from the Telangana High Court case service.

pub mod http;

pub use http::{CaseClient, CaseSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, FetchError};
