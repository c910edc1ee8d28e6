//! Reading transaction exports handed over by the outlet's store.

mod csv_export;

pub use csv_export::{read_records, read_records_from};
