//! Item-number backfill for the master table.
//!
//! Each master row's case number is looked up, as literal text, in a sequence
//! of reference tables. The first hit supplies the row's "Item No".

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray, UInt32Array};
use arrow::record_batch::RecordBatch;
use causelist_core::schema::tables;
use causelist_core::SecondaryRow;
use tracing::{debug, warn};

use crate::StoreError;

/// Rows of (item number, free text) searched for case numbers.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    pub source: String,
    rows: Vec<(u32, String)>,
}

impl ReferenceTable {
    /// Reference rows from a cause-list listing. Rows whose index does not
    /// start with a number are dropped.
    pub fn from_listing(source: impl Into<String>, rows: &[SecondaryRow]) -> Self {
        let source = source.into();
        let rows = rows
            .iter()
            .filter_map(|r| match leading_number(&r.index) {
                Some(n) => Some((n, r.case_text.clone())),
                None => {
                    debug!(source = %source, index = %r.index, "listing row without item number");
                    None
                }
            })
            .collect();
        Self { source, rows }
    }

    /// Reference rows from listing batches read back from CSV.
    pub fn from_listing_batches(
        source: impl Into<String>,
        batches: &[RecordBatch],
    ) -> Result<Self, StoreError> {
        let mut rows = Vec::new();
        for batch in batches {
            let index = string_column(batch, tables::LISTING_INDEX)?;
            let text = string_column(batch, tables::LISTING_CASE)?;
            for i in 0..batch.num_rows() {
                if index.is_null(i) || text.is_null(i) {
                    continue;
                }
                rows.push(SecondaryRow {
                    index: index.value(i).to_string(),
                    case_text: text.value(i).to_string(),
                });
            }
        }
        Ok(Self::from_listing(source, &rows))
    }

    /// Reference rows from diagnostic batches read back from CSV: the
    /// respondent text of each row, at that row's item number.
    pub fn from_diagnostic_batches(
        source: impl Into<String>,
        batches: &[RecordBatch],
    ) -> Result<Self, StoreError> {
        let mut rows = Vec::new();
        for batch in batches {
            let index = u32_column(batch, tables::ITEM_NO)?;
            let text = string_column(batch, tables::RESPONDENT)?;
            for i in 0..batch.num_rows() {
                if index.is_null(i) || text.is_null(i) {
                    continue;
                }
                rows.push((index.value(i), text.value(i).to_string()));
            }
        }
        Ok(Self {
            source: source.into(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Item number of the first row whose text contains `case_no` literally.
    pub fn first_match(&self, case_no: &str) -> Option<u32> {
        self.rows
            .iter()
            .find(|(_, text)| text.contains(case_no))
            .map(|(n, _)| *n)
    }
}

/// Rewrite the "Item No" column of `master` from `references`.
///
/// Tables are searched in order and the first match wins; rows with no match
/// keep their item number. Returns the new batch and the number of rows whose
/// item number came from a reference table.
pub fn merge_item_numbers(
    master: &RecordBatch,
    references: &[ReferenceTable],
) -> Result<(RecordBatch, usize), StoreError> {
    let schema = master.schema();
    let item_idx = schema
        .index_of(tables::ITEM_NO)
        .map_err(|_| StoreError::MissingColumn(tables::ITEM_NO))?;
    let items = u32_column(master, tables::ITEM_NO)?;
    let cases = string_column(master, tables::CASE_NO)?;

    let mut matched = 0usize;
    let merged: UInt32Array = (0..master.num_rows())
        .map(|row| {
            let current = items.is_valid(row).then(|| items.value(row));
            if cases.is_null(row) {
                return current;
            }
            let case_no = cases.value(row);
            match references.iter().find_map(|t| t.first_match(case_no)) {
                Some(n) => {
                    matched += 1;
                    Some(n)
                }
                None => {
                    debug!(case = case_no, "no listing entry for case");
                    current
                }
            }
        })
        .collect();

    if matched < master.num_rows() {
        warn!(
            matched,
            rows = master.num_rows(),
            "some master rows kept their positional item number"
        );
    }

    let mut columns: Vec<ArrayRef> = master.columns().to_vec();
    columns[item_idx] = Arc::new(merged);
    Ok((RecordBatch::try_new(schema, columns)?, matched))
}

fn u32_column<'a>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<&'a UInt32Array, StoreError> {
    batch
        .column_by_name(name)
        .ok_or(StoreError::MissingColumn(name))?
        .as_any()
        .downcast_ref::<UInt32Array>()
        .ok_or(StoreError::ColumnType(name))
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    name: &'static str,
) -> Result<&'a StringArray, StoreError> {
    batch
        .column_by_name(name)
        .ok_or(StoreError::MissingColumn(name))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or(StoreError::ColumnType(name))
}

/// Leading ASCII digits of `s`, after trimming.
fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim();
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().ok()
}
