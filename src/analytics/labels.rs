//! Laundering vs. non-laundering label distribution

use super::{complement, percentage};
use crate::repository::TableView;
use serde::Serialize;

/// Count and share of each label value in one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDistribution {
    pub total: usize,
    pub laundering: usize,
    pub legitimate: usize,
    /// `None` when the table is empty
    pub laundering_pct: Option<f64>,
    pub legitimate_pct: Option<f64>,
}

impl LabelDistribution {
    pub fn compute(view: &TableView<'_>) -> Self {
        let total = view.len();
        let laundering = view.iter().filter(|r| r.is_laundering).count();
        let laundering_pct = percentage(laundering, total);

        Self {
            total,
            laundering,
            legitimate: total - laundering,
            laundering_pct,
            legitimate_pct: complement(laundering_pct),
        }
    }
}
