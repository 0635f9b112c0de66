//! Storage is organized through [csv_store::CsvRecordStore].
//! The basic idea is:
//!  - The whole history lives in one UTF-8 CSV file.
//!  - The first line is a header, `date` followed by the registry keys.
//!  - Every log action appends one row; existing rows are never rewritten.
//!  - Readers sort by the date string and treat unparseable fields as missing.

pub mod csv_store;
pub mod entry;
