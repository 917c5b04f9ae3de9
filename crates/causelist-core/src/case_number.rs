//! Case-number discovery for Telangana High Court cause lists.
//!
//! Writ petitions are cited as `WP/<number>/<year>`, public-interest writs as
//! `WP(PIL)/<number>/<year>`. The year is always four digits.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static CASE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"WP(?:\(PIL\))?/[0-9]+/[0-9]{4}").expect("valid case-number regex"));

static CASE_NUMBER_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^WP(?:\(PIL\))?/[0-9]+/[0-9]{4}$").expect("valid case-number regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaseIdError {
    #[error("empty case number")]
    Empty,
    #[error("not a writ petition case number: {0:?}")]
    Malformed(String),
}

/// A validated case identifier such as `WP/16785/2024`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseIdentifier(String);

impl CaseIdentifier {
    /// Validate `s` against the case-number grammar.
    pub fn parse(s: &str) -> Result<Self, CaseIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CaseIdError::Empty);
        }
        if !CASE_NUMBER_EXACT.is_match(s) {
            return Err(CaseIdError::Malformed(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Query-string form: every `/` becomes `%2F`.
    pub fn url_encoded(&self) -> String {
        self.0.replace('/', "%2F")
    }
}

impl fmt::Display for CaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CaseIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Find every distinct case number in `text`.
///
/// Never fails. Duplicates are dropped; the result keeps first-occurrence
/// order so positional indices derived from it are stable across runs.
pub fn extract_case_numbers(text: &str) -> Vec<CaseIdentifier> {
    let mut seen = HashSet::new();
    CASE_NUMBER
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| seen.insert(*s))
        .map(|s| CaseIdentifier(s.to_string()))
        .collect()
}
