//! Arrow batches for the pipeline's tables and their CSV files.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray, UInt32Array};
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use causelist_core::schema::tables;
use causelist_core::{CourtRecord, DiagnosticRow, SecondaryRow};
use tracing::debug;

use crate::StoreError;

/// Build a court-table batch. An empty slice gives a zero-row batch, which
/// still writes a header.
pub fn court_records_batch(records: &[CourtRecord]) -> Result<RecordBatch, StoreError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.sl_no))),
        Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.court_no))),
        Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.item_no))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.judge.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.case_no.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.petitioners.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.officers.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.subject.as_str()))),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.respondent_advocate.as_str()),
        )),
    ];
    Ok(RecordBatch::try_new(
        Arc::new(tables::court_table_schema()),
        columns,
    )?)
}

/// Build a diagnostic batch. Sl.No and Item No are fixed at 1.
pub fn diagnostic_batch(rows: &[DiagnosticRow]) -> Result<RecordBatch, StoreError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(vec![1u32; rows.len()])),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.court_no))),
        Arc::new(UInt32Array::from(vec![1u32; rows.len()])),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.case_no.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.respondents.as_str()))),
    ];
    Ok(RecordBatch::try_new(
        Arc::new(tables::diagnostic_schema()),
        columns,
    )?)
}

/// Build a cause-list listing batch.
pub fn listing_batch(rows: &[SecondaryRow]) -> Result<RecordBatch, StoreError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.index.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.case_text.as_str()))),
    ];
    Ok(RecordBatch::try_new(
        Arc::new(tables::listing_schema()),
        columns,
    )?)
}

/// Write `batch` as CSV with a header row, replacing any existing file.
pub fn write_csv(path: &Path, batch: &RecordBatch) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = arrow::csv::Writer::new(file);
    writer.write(batch)?;
    drop(writer);
    debug!(path = %path.display(), rows = batch.num_rows(), "wrote table");
    Ok(())
}

/// Read a headed CSV file against `schema`.
pub fn read_csv(path: &Path, schema: SchemaRef) -> Result<Vec<RecordBatch>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let reader = arrow::csv::ReaderBuilder::new(schema)
        .with_header(true)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Read court-table CSV files and concatenate them in the given order.
///
/// Returns a zero-row batch when every file is header-only.
pub fn combine_court_tables(paths: &[impl AsRef<Path>]) -> Result<RecordBatch, StoreError> {
    let schema: SchemaRef = Arc::new(tables::court_table_schema());
    let mut batches = Vec::new();
    for path in paths {
        batches.extend(read_csv(path.as_ref(), schema.clone())?);
    }
    Ok(concat_batches(&schema, &batches)?)
}
