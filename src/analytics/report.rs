//! Complete analytics page for both tables under one currency selection

use super::{CurrencyDistribution, CurrencySelection, DailyPattern, LabelDistribution, MatchSummary};
use crate::repository::{DataRepository, TableView};
use crate::types::transaction::COLUMN_COUNT;
use serde::Serialize;
use tracing::debug;

/// Every analysis of one filtered table.
#[derive(Debug, Clone, Serialize)]
pub struct TableAnalytics {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    pub labels: LabelDistribution,
    pub matches: Vec<MatchSummary>,
    pub currencies: CurrencyDistribution,
    pub daily: DailyPattern,
}

impl TableAnalytics {
    pub fn compute(view: &TableView<'_>) -> Self {
        Self {
            table: view.name().to_string(),
            rows: view.len(),
            columns: COLUMN_COUNT,
            labels: LabelDistribution::compute(view),
            matches: MatchSummary::for_laundering(view),
            currencies: CurrencyDistribution::compute(view),
            daily: DailyPattern::compute(view),
        }
    }
}

/// Analytics of both base tables.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub selection: CurrencySelection,
    pub tables: Vec<TableAnalytics>,
}

impl AnalyticsReport {
    pub fn build(repo: &DataRepository, selection: &CurrencySelection) -> Self {
        let tables = repo
            .tables()
            .iter()
            .map(|table| TableAnalytics::compute(&selection.apply(&table.view())))
            .collect::<Vec<_>>();

        debug!(
            currencies = selection.len(),
            rows = ?tables.iter().map(|t| t.rows).collect::<Vec<_>>(),
            "Analytics report built"
        );

        Self {
            selection: selection.clone(),
            tables,
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableAnalytics> {
        self.tables.iter().find(|t| t.table == name)
    }
}
