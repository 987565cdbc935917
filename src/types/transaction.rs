//! Transaction records from the IBM AML transaction datasets

use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Number of columns in the transaction CSV schema.
pub const COLUMN_COUNT: usize = 11;

/// Column names in file order. The second `Account` column is the
/// destination account, exposed here as `Account.1`.
pub const COLUMN_NAMES: [&str; COLUMN_COUNT] = [
    "Timestamp",
    "From Bank",
    "Account",
    "To Bank",
    "Account.1",
    "Amount Received",
    "Receiving Currency",
    "Amount Paid",
    "Payment Currency",
    "Payment Format",
    "Is Laundering",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a dataset or form timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One row of a transaction table.
///
/// Deserialized positionally, the header row carries a duplicated
/// `Account` name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,

    /// Originating bank code
    pub from_bank: u32,

    /// Originating account, hexadecimal
    pub account: String,

    /// Destination bank code
    pub to_bank: u32,

    /// Destination account, hexadecimal
    pub account_1: String,

    pub amount_received: f64,

    pub receiving_currency: String,

    pub amount_paid: f64,

    pub payment_currency: String,

    /// ACH, Wire, Cheque, Credit Card, ...
    pub payment_format: String,

    #[serde(deserialize_with = "deserialize_flag")]
    pub is_laundering: bool,
}

impl TransactionRecord {
    /// Create a same-bank, same-account US Dollar record; tests and the
    /// sample-data tool override the fields they care about.
    pub fn new(timestamp: NaiveDateTime, amount: f64, is_laundering: bool) -> Self {
        Self {
            timestamp,
            from_bank: 10,
            account: "8000EBD30".to_string(),
            to_bank: 10,
            account_1: "8000EBD30".to_string(),
            amount_received: amount,
            receiving_currency: "US Dollar".to_string(),
            amount_paid: amount,
            payment_currency: "US Dollar".to_string(),
            payment_format: "Reinvestment".to_string(),
            is_laundering,
        }
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid timestamp {:?}", raw)))
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        other => Err(de::Error::custom(format!(
            "invalid laundering label {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_dataset_timestamp() {
        let ts = parse_timestamp("2022/09/01 00:20").unwrap();
        assert_eq!(ts.day(), 1);
        assert_eq!(ts.minute(), 20);
    }

    #[test]
    fn test_parse_form_timestamp_formats() {
        assert!(parse_timestamp("2022-09-05 13:45").is_some());
        assert!(parse_timestamp("2022-09-05 13:45:10").is_some());
        assert_eq!(parse_timestamp("2022-09-05").unwrap().hour(), 0);
        assert!(parse_timestamp("05/09/2022").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_record_serialization() {
        let ts = parse_timestamp("2022/09/01 00:20").unwrap();
        let record = TransactionRecord::new(ts, 100.5, true);

        let json = serde_json::to_string(&record).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["account_1"], "8000EBD30");
        assert_eq!(value["is_laundering"], true);
        assert_eq!(value["amount_paid"], 100.5);
    }
}
