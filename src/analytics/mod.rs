//! Descriptive analytics over the base transaction tables.
//!
//! Every function here takes a borrowed [`TableView`](crate::repository::TableView)
//! and returns a plain value; nothing mutates the underlying tables.

pub mod currency;
pub mod filter;
pub mod labels;
pub mod matching;
pub mod report;
pub mod temporal;

pub use currency::{CurrencyDistribution, CurrencyShare};
pub use filter::{CurrencySelection, UnknownCurrencies};
pub use labels::LabelDistribution;
pub use matching::{MatchField, MatchSummary};
pub use report::{AnalyticsReport, TableAnalytics};
pub use temporal::DailyPattern;

/// `part / total` as a percentage rounded to two decimals, `None` for an
/// empty total.
pub(crate) fn percentage(part: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round2(part as f64 / total as f64 * 100.0))
}

/// Complement of a rounded percentage, so that both halves sum to 100.
pub(crate) fn complement(pct: Option<f64>) -> Option<f64> {
    pct.map(|p| round2(100.0 - p))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), Some(33.33));
        assert_eq!(complement(percentage(1, 3)), Some(66.67));
        assert_eq!(percentage(7, 10), Some(70.0));
        assert_eq!(percentage(0, 0), None);
        assert_eq!(complement(None), None);
    }
}
