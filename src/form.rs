//! Prediction form: raw analyst input and its validated, typed form.

use crate::error::{FieldError, ValidationErrors};
use crate::types::transaction::parse_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::str::FromStr;

/// Input fields of the prediction form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Timestamp,
    FromBank,
    FromAccount,
    ToBank,
    ToAccount,
    AmountReceived,
    ReceivingCurrency,
    AmountPaid,
    PaymentCurrency,
    PaymentFormat,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Timestamp,
        FormField::FromBank,
        FormField::FromAccount,
        FormField::ToBank,
        FormField::ToAccount,
        FormField::AmountReceived,
        FormField::ReceivingCurrency,
        FormField::AmountPaid,
        FormField::PaymentCurrency,
        FormField::PaymentFormat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Timestamp => "Timestamp",
            FormField::FromBank => "From Bank",
            FormField::FromAccount => "From Account",
            FormField::ToBank => "To Bank",
            FormField::ToAccount => "To Account",
            FormField::AmountReceived => "Amount Received",
            FormField::ReceivingCurrency => "Receiving Currency",
            FormField::AmountPaid => "Amount Paid",
            FormField::PaymentCurrency => "Payment Currency",
            FormField::PaymentFormat => "Payment Format",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            FormField::Timestamp => "Format: YYYY-MM-DD HH:MM",
            FormField::FromBank => "Numeric code of the originating bank",
            FormField::FromAccount => "Hexadecimal code of the originating account",
            FormField::ToBank => "Numeric code of the destination bank",
            FormField::ToAccount => "Hexadecimal code of the destination account",
            FormField::AmountReceived => "Amount credited to the destination account",
            FormField::ReceivingCurrency => "Currency of the amount received",
            FormField::AmountPaid => "Amount debited in the payment currency",
            FormField::PaymentCurrency => "Currency the payment was made in",
            FormField::PaymentFormat => "ACH, Wire, Cheque, Credit Card, ...",
        }
    }

    /// Command-line key, e.g. `from_bank`.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Timestamp => "timestamp",
            FormField::FromBank => "from_bank",
            FormField::FromAccount => "from_account",
            FormField::ToBank => "to_bank",
            FormField::ToAccount => "to_account",
            FormField::AmountReceived => "amount_received",
            FormField::ReceivingCurrency => "receiving_currency",
            FormField::AmountPaid => "amount_paid",
            FormField::PaymentCurrency => "payment_currency",
            FormField::PaymentFormat => "payment_format",
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        FormField::ALL
            .iter()
            .copied()
            .find(|f| f.key() == normalized)
            .ok_or_else(|| format!("unknown form field {:?}", s))
    }
}

/// Raw form contents as typed by the analyst.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionForm {
    values: [String; 10],
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values[field as usize] = value.into();
    }

    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FormField) -> &str {
        &self.values[field as usize]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Parse every field, collecting all failures.
    pub fn validate(&self) -> Result<CandidateTransaction, ValidationErrors> {
        let mut errors = Vec::new();

        let timestamp = self.parse(FormField::Timestamp, &mut errors, |raw| {
            parse_timestamp(raw).ok_or_else(|| "expected YYYY-MM-DD HH:MM".to_string())
        });
        let from_bank = self.parse(FormField::FromBank, &mut errors, parse_bank);
        let from_account = self.parse(FormField::FromAccount, &mut errors, parse_account);
        let to_bank = self.parse(FormField::ToBank, &mut errors, parse_bank);
        let to_account = self.parse(FormField::ToAccount, &mut errors, parse_account);
        let amount_received = self.parse(FormField::AmountReceived, &mut errors, parse_amount);
        let receiving_currency =
            self.parse(FormField::ReceivingCurrency, &mut errors, parse_category);
        let amount_paid = self.parse(FormField::AmountPaid, &mut errors, parse_amount);
        let payment_currency = self.parse(FormField::PaymentCurrency, &mut errors, parse_category);
        let payment_format = self.parse(FormField::PaymentFormat, &mut errors, parse_category);

        match (
            timestamp,
            from_bank,
            from_account,
            to_bank,
            to_account,
            amount_received,
            receiving_currency,
            amount_paid,
            payment_currency,
            payment_format,
        ) {
            (
                Some(timestamp),
                Some(from_bank),
                Some(from_account),
                Some(to_bank),
                Some(to_account),
                Some(amount_received),
                Some(receiving_currency),
                Some(amount_paid),
                Some(payment_currency),
                Some(payment_format),
            ) if errors.is_empty() => Ok(CandidateTransaction {
                timestamp,
                from_bank,
                from_account,
                to_bank,
                to_account,
                amount_received,
                receiving_currency,
                amount_paid,
                payment_currency,
                payment_format,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }

    fn parse<T, F>(&self, field: FormField, errors: &mut Vec<FieldError>, parser: F) -> Option<T>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        let raw = self.get(field).trim();
        let result = if raw.is_empty() {
            Err("required".to_string())
        } else {
            parser(raw)
        };

        match result {
            Ok(value) => Some(value),
            Err(reason) => {
                errors.push(FieldError {
                    field: field.label(),
                    value: raw.to_string(),
                    reason,
                });
                None
            }
        }
    }
}

fn parse_bank(raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| "expected a decimal bank code".to_string())
}

fn parse_account(raw: &str) -> Result<u64, String> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u64::from_str_radix(digits, 16).map_err(|_| "expected a hexadecimal account".to_string())
}

fn parse_amount(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err("expected a number".to_string()),
    }
}

fn parse_category(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}

/// A fully parsed transaction ready for encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTransaction {
    pub timestamp: NaiveDateTime,
    pub from_bank: u32,
    pub from_account: u64,
    pub to_bank: u32,
    pub to_account: u64,
    pub amount_received: f64,
    pub receiving_currency: String,
    pub amount_paid: f64,
    pub payment_currency: String,
    pub payment_format: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A cross-bank US Dollar wire that parses cleanly.
    pub fn valid_form() -> PredictionForm {
        PredictionForm::new()
            .with(FormField::Timestamp, "2022-09-01 10:05")
            .with(FormField::FromBank, "070")
            .with(FormField::FromAccount, "100428660")
            .with(FormField::ToBank, "001")
            .with(FormField::ToAccount, "8000EC280")
            .with(FormField::AmountReceived, "2124.09")
            .with(FormField::ReceivingCurrency, "US Dollar")
            .with(FormField::AmountPaid, "2124.09")
            .with(FormField::PaymentCurrency, "US Dollar")
            .with(FormField::PaymentFormat, "ACH")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::valid_form;
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_valid_form() {
        let candidate = valid_form().validate().unwrap();

        assert_eq!(candidate.timestamp.hour(), 10);
        assert_eq!(candidate.from_bank, 70);
        assert_eq!(candidate.from_account, 0x100428660);
        assert_eq!(candidate.to_account, 0x8000EC280);
        assert_eq!(candidate.amount_paid, 2124.09);
        assert_eq!(candidate.payment_format, "ACH");
    }

    #[test]
    fn test_all_invalid_fields_reported() {
        let form = valid_form()
            .with(FormField::FromBank, "ten")
            .with(FormField::ToAccount, "XYZ")
            .with(FormField::AmountReceived, "NaN")
            .with(FormField::Timestamp, "yesterday");

        let err = form.validate().unwrap_err();
        let fields: Vec<&str> = err.fields().collect();

        assert_eq!(
            fields,
            vec!["Timestamp", "From Bank", "To Account", "Amount Received"]
        );
    }

    #[test]
    fn test_empty_form_requires_every_field() {
        let err = PredictionForm::new().validate().unwrap_err();
        assert_eq!(err.0.len(), 10);
        assert!(err.0.iter().all(|e| e.reason == "required"));
    }

    #[test]
    fn test_account_accepts_hex_prefix() {
        let form = valid_form().with(FormField::FromAccount, "0x8000ebd30");
        assert_eq!(form.validate().unwrap().from_account, 0x8000EBD30);
    }

    #[test]
    fn test_form_field_keys() {
        assert_eq!("from_bank".parse::<FormField>(), Ok(FormField::FromBank));
        assert_eq!("Payment-Format".parse::<FormField>(), Ok(FormField::PaymentFormat));
        assert!("iban".parse::<FormField>().is_err());
    }

    #[test]
    fn test_clear_resets_values() {
        let mut form = valid_form();
        form.clear();
        assert_eq!(form, PredictionForm::new());
    }
}
