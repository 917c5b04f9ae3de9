/// Arrow schema definitions for the CSV tables the pipeline reads and writes.
pub mod tables {
    use arrow::datatypes::{DataType, Field, Schema};

    pub const SL_NO: &str = "Sl.No";
    pub const COURT_NO: &str = "Court No";
    pub const ITEM_NO: &str = "Item No";
    pub const JUDGE: &str = "Hon'ble Justice";
    pub const CASE_NO: &str = "Case No";
    pub const PETITIONER: &str = "Petitioner Name";
    pub const RESPONDENT: &str = "Respondant Name";
    pub const SUBJECT: &str = "Subject";
    pub const RESPONDENT_ADVOCATE: &str = "Respondent Advocate";

    /// Cause-list extraction keeps the generic header names of the source table.
    pub const LISTING_INDEX: &str = "Column 1";
    pub const LISTING_CASE: &str = "Column 2";

    /// Schema for per-court output tables and the combined master table.
    pub fn court_table_schema() -> Schema {
        Schema::new(vec![
            Field::new(SL_NO, DataType::UInt32, true),
            Field::new(COURT_NO, DataType::UInt32, true),
            Field::new(ITEM_NO, DataType::UInt32, true),
            Field::new(JUDGE, DataType::Utf8, true),
            Field::new(CASE_NO, DataType::Utf8, true),
            Field::new(PETITIONER, DataType::Utf8, true),
            Field::new(RESPONDENT, DataType::Utf8, true),
            Field::new(SUBJECT, DataType::Utf8, true),
            Field::new(RESPONDENT_ADVOCATE, DataType::Utf8, true),
        ])
    }

    /// Schema for per-court respondent trace tables.
    pub fn diagnostic_schema() -> Schema {
        Schema::new(vec![
            Field::new(SL_NO, DataType::UInt32, true),
            Field::new(COURT_NO, DataType::UInt32, true),
            Field::new(ITEM_NO, DataType::UInt32, true),
            Field::new(CASE_NO, DataType::Utf8, true),
            Field::new(RESPONDENT, DataType::Utf8, true),
        ])
    }

    /// Schema for tables lifted from cause-list HTML.
    pub fn listing_schema() -> Schema {
        Schema::new(vec![
            Field::new(LISTING_INDEX, DataType::Utf8, true),
            Field::new(LISTING_CASE, DataType::Utf8, true),
        ])
    }
}
