//! Day-of-month pattern of laundering transactions

use crate::repository::TableView;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Laundering transactions grouped by calendar day of month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPattern {
    /// Day of month (1-31) to transaction count, days without any
    /// laundering transaction are absent.
    pub counts: BTreeMap<u32, usize>,
    /// Mean of the per-day counts, `None` when there are no days
    pub mean: Option<f64>,
}

impl DailyPattern {
    pub fn compute(view: &TableView<'_>) -> Self {
        let mut counts = BTreeMap::new();
        for record in view.laundering_only().iter() {
            *counts.entry(record.timestamp.day()).or_insert(0) += 1;
        }

        let mean = if counts.is_empty() {
            None
        } else {
            Some(counts.values().sum::<usize>() as f64 / counts.len() as f64)
        };

        Self { counts, mean }
    }

    /// Days whose count is above the mean.
    pub fn days_above_mean(&self) -> Vec<u32> {
        match self.mean {
            Some(mean) => self
                .counts
                .iter()
                .filter(|(_, &count)| count as f64 > mean)
                .map(|(&day, _)| day)
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::TransactionTable;
    use crate::types::transaction::parse_timestamp;
    use crate::types::TransactionRecord;

    fn laundering_on(days: &[u32]) -> TransactionTable {
        let records = days
            .iter()
            .map(|d| {
                let ts = parse_timestamp(&format!("2022/09/{:02} 12:00", d)).unwrap();
                TransactionRecord::new(ts, 10.0, true)
            })
            .collect();
        TransactionTable::new("days", records)
    }

    #[test]
    fn test_groups_by_day() {
        let table = laundering_on(&[1, 1, 2, 5]);
        let pattern = DailyPattern::compute(&table.view());

        let expected: BTreeMap<u32, usize> = [(1, 2), (2, 1), (5, 1)].into_iter().collect();
        assert_eq!(pattern.counts, expected);
        // Mean of the per-day counts {2, 1, 1}.
        assert!((pattern.mean.unwrap() - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(pattern.days_above_mean(), vec![1]);
    }

    #[test]
    fn test_one_row_per_day_has_unit_mean() {
        let table = laundering_on(&[1, 2, 5]);
        let pattern = DailyPattern::compute(&table.view());
        assert_eq!(pattern.mean, Some(1.0));
        assert!(pattern.days_above_mean().is_empty());
    }

    #[test]
    fn test_ignores_legitimate_rows() {
        let ts = parse_timestamp("2022/09/03 12:00").unwrap();
        let table = TransactionTable::new("clean", vec![TransactionRecord::new(ts, 1.0, false)]);

        let pattern = DailyPattern::compute(&table.view());
        assert!(pattern.counts.is_empty());
        assert_eq!(pattern.mean, None);
    }
}
