//! Error types for data loading, form validation and categorical encoding.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading one of the base transaction tables.
///
/// Always fatal: the dashboard cannot start without both tables.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("expected {expected} columns, found {found} in header of {table}")]
    Schema {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed record in {table} at line {line}: {reason}")]
    Record {
        table: String,
        line: u64,
        reason: String,
    },
}

/// A single prediction-form field that failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} ({})", self.field, self.value, self.reason)
    }
}

/// Every invalid field of a submitted form, reported together.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("please enter valid values for: {}", field_list(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }
}

fn field_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Categorical value outside the domain an encoder was fit on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("unseen category {value:?} for column {column:?}")]
    UnseenCategory { column: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ValidationErrors(vec![
            FieldError {
                field: "From Bank",
                value: "abc".to_string(),
                reason: "not a decimal integer".to_string(),
            },
            FieldError {
                field: "Amount Paid",
                value: "".to_string(),
                reason: "empty".to_string(),
            },
        ]);

        assert_eq!(
            err.to_string(),
            "please enter valid values for: From Bank, Amount Paid"
        );
        assert_eq!(err.fields().count(), 2);
    }
}
