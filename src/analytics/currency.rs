//! Payment-currency breakdown of laundering transactions

use super::percentage;
use crate::repository::TableView;
use serde::Serialize;
use std::collections::HashMap;

/// One slice of the currency breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyShare {
    pub currency: String,
    pub count: usize,
    pub share_pct: f64,
}

/// Laundering transactions per payment currency, largest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyDistribution {
    pub total: usize,
    pub shares: Vec<CurrencyShare>,
}

impl CurrencyDistribution {
    pub fn compute(view: &TableView<'_>) -> Self {
        let laundering = view.laundering_only();
        let total = laundering.len();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in laundering.iter() {
            *counts.entry(record.payment_currency.as_str()).or_insert(0) += 1;
        }

        let mut shares: Vec<CurrencyShare> = counts
            .into_iter()
            .map(|(currency, count)| CurrencyShare {
                currency: currency.to_string(),
                count,
                share_pct: percentage(count, total).unwrap_or(0.0),
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.currency.cmp(&b.currency)));

        Self { total, shares }
    }

    /// The `n` most frequent currencies.
    pub fn top(&self, n: usize) -> &[CurrencyShare] {
        &self.shares[..n.min(self.shares.len())]
    }
}
