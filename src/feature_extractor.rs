//! Feature extraction for the laundering classifier.
//!
//! Builds the single-row feature vector the XGBoost model was trained on.
//! Features are emitted in the exact column order of the training frame.

use crate::encoder::{CategoricalColumn, CategoricalEncoders};
use crate::error::EncodingError;
use crate::form::CandidateTransaction;

const FEATURE_NAMES: [&str; 10] = [
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
];

/// Transforms validated candidates into model input features.
pub struct FeatureExtractor {
    encoders: CategoricalEncoders,
}

impl FeatureExtractor {
    /// Create a feature extractor around encoders fit on the reference table.
    pub fn new(encoders: CategoricalEncoders) -> Self {
        Self { encoders }
    }

    pub fn encoders(&self) -> &CategoricalEncoders {
        &self.encoders
    }

    /// Extract features from a candidate transaction.
    ///
    /// Fails if any categorical value lies outside the fitted domain.
    pub fn extract(&self, tx: &CandidateTransaction) -> Result<Vec<f32>, EncodingError> {
        let receiving_currency = self
            .encoders
            .encode(CategoricalColumn::ReceivingCurrency, &tx.receiving_currency)?;
        let payment_currency = self
            .encoders
            .encode(CategoricalColumn::PaymentCurrency, &tx.payment_currency)?;
        let payment_format = self
            .encoders
            .encode(CategoricalColumn::PaymentFormat, &tx.payment_format)?;

        let mut features = Vec::with_capacity(FEATURE_NAMES.len());

        // Epoch seconds, the naive timestamp read as UTC
        features.push(tx.timestamp.and_utc().timestamp() as f32);
        features.push(tx.from_bank as f32);
        features.push(tx.from_account as f32);
        features.push(tx.to_bank as f32);
        features.push(tx.to_account as f32);
        features.push(tx.amount_received as f32);
        features.push(receiving_currency as f32);
        features.push(tx.amount_paid as f32);
        features.push(payment_currency as f32);
        features.push(payment_format as f32);

        Ok(features)
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    /// Get feature names (training column order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}
