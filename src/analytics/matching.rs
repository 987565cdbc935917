//! Field-pair match rates among laundering transactions

use super::{complement, percentage};
use crate::repository::TableView;
use crate::types::TransactionRecord;
use serde::Serialize;

/// The four compared field pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchField {
    /// Account == Account.1
    Account,
    /// From Bank == To Bank
    Bank,
    /// Receiving Currency == Payment Currency
    Currency,
    /// Amount Received == Amount Paid
    Amount,
}

impl MatchField {
    pub const ALL: [MatchField; 4] = [
        MatchField::Account,
        MatchField::Bank,
        MatchField::Currency,
        MatchField::Amount,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MatchField::Account => "Account",
            MatchField::Bank => "Bank",
            MatchField::Currency => "Currency",
            MatchField::Amount => "Amount",
        }
    }

    /// The comparison this pair stands for, as shown under the table.
    pub fn describe(&self) -> &'static str {
        match self {
            MatchField::Account => "Account == Account.1",
            MatchField::Bank => "From Bank == To Bank",
            MatchField::Currency => "Receiving Currency == Payment Currency",
            MatchField::Amount => "Amount Received == Amount Paid",
        }
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            MatchField::Account => record.account == record.account_1,
            MatchField::Bank => record.from_bank == record.to_bank,
            MatchField::Currency => record.receiving_currency == record.payment_currency,
            MatchField::Amount => record.amount_received == record.amount_paid,
        }
    }
}

/// Match statistics for one field pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub field: MatchField,
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// `None` when there are no rows
    pub match_pct: Option<f64>,
    pub no_match_pct: Option<f64>,
}

impl MatchSummary {
    /// Summarize one pair over all rows of `view`.
    pub fn compute(view: &TableView<'_>, field: MatchField) -> Self {
        let total = view.len();
        let matched = view.iter().filter(|r| field.matches(r)).count();
        let match_pct = percentage(matched, total);

        Self {
            field,
            total,
            matched,
            unmatched: total - matched,
            match_pct,
            no_match_pct: complement(match_pct),
        }
    }

    /// Summaries of all four pairs, restricted to laundering rows.
    pub fn for_laundering(view: &TableView<'_>) -> Vec<Self> {
        let laundering = view.laundering_only();
        MatchField::ALL
            .iter()
            .map(|&field| Self::compute(&laundering, field))
            .collect()
    }
}
