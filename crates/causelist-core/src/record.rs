//! Case-detail payloads from the High Court case service and the rows derived
//! from them.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::CaseIdentifier;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("case details are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("case details array is empty")]
    Empty,
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// One case as returned by `caseDetails.jsp`.
///
/// Only the fields the classifier reads are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub district: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prayer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orderdetails: Vec<OrderDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub respondentadv: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub petdetails: Vec<Petitioner>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resdetails: Vec<Respondent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub judgename: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Petitioner {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pname: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Respondent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
}

impl CaseRecord {
    /// Decode a response body. The service wraps the case in a one-element
    /// array; anything after the first element is ignored.
    pub fn from_json(body: &str) -> Result<Self, RecordError> {
        let cases: Vec<CaseRecord> = serde_json::from_str(body)?;
        cases.into_iter().next().ok_or(RecordError::Empty)
    }
}

/// Output of classifying an included case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub judge: String,
    pub petitioners: String,
    pub officers: String,
    pub subject: String,
    pub respondent_advocate: String,
}

/// One row of a court's output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtRecord {
    pub sl_no: u32,
    pub court_no: u32,
    pub item_no: u32,
    pub judge: String,
    pub case_no: CaseIdentifier,
    pub petitioners: String,
    pub officers: String,
    pub subject: String,
    pub respondent_advocate: String,
}

impl CourtRecord {
    pub fn new(
        sl_no: u32,
        court_no: u32,
        item_no: u32,
        case_no: CaseIdentifier,
        result: ClassificationResult,
    ) -> Self {
        Self {
            sl_no,
            court_no,
            item_no,
            judge: result.judge,
            case_no,
            petitioners: result.petitioners,
            officers: result.officers,
            subject: result.subject,
            respondent_advocate: result.respondent_advocate,
        }
    }
}

/// Per-case trace row: every respondent's lower-cased name and address,
/// before any rule filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRow {
    pub court_no: u32,
    pub case_no: CaseIdentifier,
    pub respondents: String,
}

/// A row lifted from a cause-list HTML table: the listed item number and the
/// leading token of the case cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryRow {
    pub index: String,
    pub case_text: String,
}
