//! Reads Oracle AWR and STATSPACK text reports into typed snapshots and
//! charts them over time.

#[macro_use]
pub mod macros;

pub mod analyze;
pub mod awr;
pub mod awr_txt;
pub mod error;
pub mod staticdata;
pub mod tools;

pub use awr::{parse_awr_dir, parse_awr_report, AwrCollection, FailurePolicy, ParseOptions, SnapKey, Snapshot};
pub use awr_txt::{parse_awr_text, ReportLayout};
pub use error::AwrError;
