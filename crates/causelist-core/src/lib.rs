pub mod case_number;
pub mod record;
pub mod schema;

pub use case_number::{CaseIdError, CaseIdentifier, extract_case_numbers};
pub use record::{
    CaseRecord, ClassificationResult, CourtRecord, DiagnosticRow, OrderDetail, Petitioner,
    RecordError, Respondent, SecondaryRow,
};
