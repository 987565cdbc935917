//! Plain-text rendering of dashboard pages.
//!
//! Tables are fixed-width, charts are block-character bars. Missing
//! percentages (empty selections) print as `NaN`.

use crate::analytics::{AnalyticsReport, TableAnalytics};
use crate::encoder::{CategoricalColumn, CategoricalEncoders};
use crate::form::{FormField, PredictionForm};
use crate::types::PredictionReport;

const RULE: &str = "══════════════════════════════════════════════════════════════";
const BAR_WIDTH: usize = 40;

fn fmt_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:.2}", p),
        None => "NaN".to_string(),
    }
}

fn fmt_mean(mean: Option<f64>) -> String {
    match mean {
        Some(m) => format!("{:.2}", m),
        None => "NaN".to_string(),
    }
}

fn bar(pct: f64, width: usize) -> String {
    let len = ((pct / 100.0) * width as f64).round().clamp(0.0, width as f64) as usize;
    "█".repeat(len)
}

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("\n{}\n {}\n{}\n", RULE, title, RULE));
}

/// The analytics ("Home") page.
pub fn render_analytics(report: &AnalyticsReport) -> String {
    let mut out = String::new();

    heading(&mut out, "Money Laundering: Analyzing IBM Transactions");
    let selected: Vec<&str> = report.selection.iter().collect();
    out.push_str(&format!(
        "Currencies ({}): {}\n",
        selected.len(),
        if selected.is_empty() {
            "<none>".to_string()
        } else {
            selected.join(", ")
        }
    ));

    heading(&mut out, "Dataset Description");
    for table in &report.tables {
        out.push_str(&format!(
            "Data Dimension({}): {} rows and {} columns.\n",
            table.table, table.rows, table.columns
        ));
    }

    heading(&mut out, "Laundering Summary (%)");
    out.push_str(&format!("{:<16}", ""));
    for table in &report.tables {
        out.push_str(&format!("{:>22}", format!("{} - Percentage", table.table)));
    }
    out.push('\n');
    out.push_str(&format!("{:<16}", "Laundering"));
    for table in &report.tables {
        out.push_str(&format!("{:>22}", fmt_pct(table.labels.laundering_pct)));
    }
    out.push('\n');
    out.push_str(&format!("{:<16}", "No Laundering"));
    for table in &report.tables {
        out.push_str(&format!("{:>22}", fmt_pct(table.labels.legitimate_pct)));
    }
    out.push('\n');
    for table in &report.tables {
        let pct = table.labels.laundering_pct.unwrap_or(0.0);
        out.push_str(&format!(
            "  {:<10} {:>6}% {}\n",
            table.table,
            fmt_pct(table.labels.laundering_pct),
            bar(pct, BAR_WIDTH)
        ));
    }

    heading(&mut out, "Matched fields in laundering transactions");
    for table in &report.tables {
        render_matches(&mut out, table);
    }
    if let Some(table) = report.tables.first() {
        for summary in &table.matches {
            out.push_str(&format!(
                "  * Match {}: {}\n",
                summary.field.label(),
                summary.field.describe()
            ));
        }
    }

    heading(&mut out, "Payment Currency of laundering transactions");
    for table in &report.tables {
        out.push_str(&format!(
            "{}_laundering ({} transactions):\n",
            table.table, table.currencies.total
        ));
        if table.currencies.shares.is_empty() {
            out.push_str("  (no laundering transactions)\n");
        }
        for share in &table.currencies.shares {
            out.push_str(&format!(
                "  {:<18} {:>6} ({:>5.1}%) {}\n",
                share.currency,
                share.count,
                share.share_pct,
                bar(share.share_pct, BAR_WIDTH)
            ));
        }
    }

    heading(&mut out, "Laundering transactions by day of month");
    for table in &report.tables {
        render_daily(&mut out, table);
    }

    out
}

fn render_matches(out: &mut String, table: &TableAnalytics) {
    out.push_str(&format!("{}_laundering:\n", table.table));
    out.push_str(&format!(
        "  {:<10} {:>8} {:>18} {:>21}\n",
        "Column", "Total", "Match Percentage", "No Match Percentage"
    ));
    for summary in &table.matches {
        out.push_str(&format!(
            "  {:<10} {:>8} {:>18} {:>21}\n",
            summary.field.label(),
            summary.total,
            fmt_pct(summary.match_pct),
            fmt_pct(summary.no_match_pct)
        ));
    }
}

fn render_daily(out: &mut String, table: &TableAnalytics) {
    let daily = &table.daily;
    out.push_str(&format!(
        "{}_laundering (mean: {}):\n",
        table.table,
        fmt_mean(daily.mean)
    ));

    let max = daily.counts.values().copied().max().unwrap_or(0);
    for (day, count) in &daily.counts {
        let pct = if max > 0 { *count as f64 / max as f64 * 100.0 } else { 0.0 };
        let marker = match daily.mean {
            Some(mean) if *count as f64 > mean => "+",
            _ => " ",
        };
        out.push_str(&format!(
            "  Day {:>2} {:>6} {} {}\n",
            day,
            count,
            marker,
            bar(pct, BAR_WIDTH)
        ));
    }
    let above = daily.days_above_mean();
    if !above.is_empty() {
        let days: Vec<String> = above.iter().map(u32::to_string).collect();
        out.push_str(&format!("  Above average on days: {}\n", days.join(", ")));
    }
}

/// The prediction page: form state plus the allowed categorical values.
pub fn render_prediction_page(
    form: &PredictionForm,
    encoders: Option<&CategoricalEncoders>,
) -> String {
    let mut out = String::new();
    heading(&mut out, "Money Laundering: Prediction");

    for field in FormField::ALL {
        let value = form.get(field);
        out.push_str(&format!(
            "  {:<20} {:<24} {}\n",
            field.key(),
            if value.is_empty() { "-" } else { value },
            field.help()
        ));
    }

    if let Some(encoders) = encoders {
        out.push_str("\nAllowed values:\n");
        for column in CategoricalColumn::ALL {
            out.push_str(&format!(
                "  {}: {}\n",
                column.name(),
                encoders.get(column).classes().join(", ")
            ));
        }
    }
    out.push_str("\nUse `set <field> <value>` then `submit`.\n");
    out
}

/// A prediction outcome.
pub fn render_prediction(report: &PredictionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n**{}**\n", report.verdict));
    out.push_str(&format!(
        "  probability {:.4} (threshold {:.2}), report {}\n",
        report.probability, report.threshold, report.report_id
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::CurrencySelection;
    use crate::form::fixtures::valid_form;
    use crate::repository::fixtures;

    #[test]
    fn test_render_analytics_page() {
        let repo = fixtures::repository();
        let report =
            AnalyticsReport::build(&repo, &CurrencySelection::new(repo.currency_options()));

        let page = render_analytics(&report);

        assert!(page.contains("Data Dimension(li_small): 12 rows and 11 columns."));
        assert!(page.contains("Match Percentage"));
        assert!(page.contains("Match Account: Account == Account.1"));
        assert!(page.contains("US Dollar"));
        assert!(page.contains("Day  1"));
    }

    #[test]
    fn test_empty_selection_renders_nan() {
        let repo = fixtures::repository();
        let report = AnalyticsReport::build(&repo, &CurrencySelection::none());

        let page = render_analytics(&report);

        assert!(page.contains("<none>"));
        assert!(page.contains("NaN"));
        assert!(page.contains("(no laundering transactions)"));
    }

    #[test]
    fn test_render_prediction_page() {
        let encoders = CategoricalEncoders::fit(&fixtures::li_small());
        let page = render_prediction_page(&valid_form(), Some(&encoders));

        assert!(page.contains("from_bank"));
        assert!(page.contains("070"));
        assert!(page.contains("Payment Format: ACH, Cash, Cheque"));
    }

    #[test]
    fn test_render_prediction() {
        let report = PredictionReport::new(0.2, 0.5);
        assert!(render_prediction(&report).contains("**Low Possibility of Laundering**"));
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(100.0, 10).chars().count(), 10);
        assert_eq!(bar(0.0, 10), "");
        assert_eq!(bar(250.0, 10).chars().count(), 10);
    }
}
