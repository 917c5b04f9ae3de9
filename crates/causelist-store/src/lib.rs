//! Table layer: Arrow batches for court, diagnostic, and cause-list tables,
//! their CSV persistence, and the item-number merge over the master table.

mod error;
pub use error::StoreError;

pub mod listing;
pub mod merge;
pub mod table;

pub use listing::extract_listing;
pub use merge::{ReferenceTable, merge_item_numbers};
pub use table::{
    combine_court_tables, court_records_batch, diagnostic_batch, listing_batch, read_csv,
    write_csv,
};
