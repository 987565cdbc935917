//! Type definitions shared by the analytics and inference components

pub mod report;
pub mod transaction;

pub use report::{PredictionReport, Verdict};
pub use transaction::TransactionRecord;
