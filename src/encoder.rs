//! Label encoding of categorical transaction fields.
//!
//! Codes are assigned by sorted position of the distinct values seen in the
//! reference table, the same assignment the model was trained with.

use crate::error::EncodingError;
use crate::repository::TransactionTable;
use crate::types::TransactionRecord;
use serde::Serialize;

/// Categorical columns fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoricalColumn {
    ReceivingCurrency,
    PaymentCurrency,
    PaymentFormat,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 3] = [
        CategoricalColumn::ReceivingCurrency,
        CategoricalColumn::PaymentCurrency,
        CategoricalColumn::PaymentFormat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CategoricalColumn::ReceivingCurrency => "Receiving Currency",
            CategoricalColumn::PaymentCurrency => "Payment Currency",
            CategoricalColumn::PaymentFormat => "Payment Format",
        }
    }

    fn value<'a>(&self, record: &'a TransactionRecord) -> &'a str {
        match self {
            CategoricalColumn::ReceivingCurrency => &record.receiving_currency,
            CategoricalColumn::PaymentCurrency => &record.payment_currency,
            CategoricalColumn::PaymentFormat => &record.payment_format,
        }
    }
}

/// Bijection between the distinct values of one column and `0..n`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on arbitrary values; duplicates collapse, order is sorted.
    pub fn fit<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self {
            column: column.to_string(),
            classes,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Fitted domain, sorted.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, value: &str) -> Result<u32, EncodingError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map(|idx| idx as u32)
            .map_err(|_| EncodingError::UnseenCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    pub fn inverse_transform(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }
}

/// One fitted encoder per categorical column.
#[derive(Debug, Clone)]
pub struct CategoricalEncoders {
    receiving_currency: LabelEncoder,
    payment_currency: LabelEncoder,
    payment_format: LabelEncoder,
}

impl CategoricalEncoders {
    /// Fit every categorical column on `table`.
    pub fn fit(table: &TransactionTable) -> Self {
        let fit = |column: CategoricalColumn| {
            LabelEncoder::fit(
                column.name(),
                table.records().iter().map(|r| column.value(r)),
            )
        };

        Self {
            receiving_currency: fit(CategoricalColumn::ReceivingCurrency),
            payment_currency: fit(CategoricalColumn::PaymentCurrency),
            payment_format: fit(CategoricalColumn::PaymentFormat),
        }
    }

    pub fn get(&self, column: CategoricalColumn) -> &LabelEncoder {
        match column {
            CategoricalColumn::ReceivingCurrency => &self.receiving_currency,
            CategoricalColumn::PaymentCurrency => &self.payment_currency,
            CategoricalColumn::PaymentFormat => &self.payment_format,
        }
    }

    pub fn encode(&self, column: CategoricalColumn, value: &str) -> Result<u32, EncodingError> {
        self.get(column).transform(value)
    }
}
