//! Sample Dataset Generator
//!
//! Writes synthetic LI-Small / HI-Small style transaction CSVs so the
//! dashboard can be run without the Kaggle datasets.

use aml_dashboard::types::transaction::COLUMN_NAMES;
use aml_dashboard::TransactionRecord;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;

const CURRENCIES: [&str; 8] = [
    "US Dollar",
    "Euro",
    "Yuan",
    "Saudi Riyal",
    "UK Pound",
    "Rupee",
    "Yen",
    "Swiss Franc",
];

const FORMATS: [&str; 6] = ["ACH", "Cash", "Cheque", "Credit Card", "Reinvestment", "Wire"];

#[derive(Parser, Debug)]
#[command(name = "aml-sample-data", about = "Generate synthetic AML transaction datasets")]
struct Cli {
    /// Output directory
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
    /// Rows per dataset
    #[arg(long, default_value_t = 10_000)]
    rows: usize,
    /// Laundering rate of the LI (low illicit) dataset
    #[arg(long, default_value_t = 0.0005)]
    li_rate: f64,
    /// Laundering rate of the HI (high illicit) dataset
    #[arg(long, default_value_t = 0.001)]
    hi_rate: f64,
}

/// Transaction generator for demo datasets
struct TransactionGenerator {
    rng: rand::rngs::ThreadRng,
    start: NaiveDateTime,
}

impl TransactionGenerator {
    fn new() -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(2022, 9, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .context("invalid start date")?;
        Ok(Self {
            rng: rand::thread_rng(),
            start,
        })
    }

    fn account(&mut self) -> String {
        format!("{:09X}", self.rng.gen_range(0x8000_0000_u64..0x8_1000_0000))
    }

    fn timestamp(&mut self, max_days: i64) -> NaiveDateTime {
        self.start + Duration::minutes(self.rng.gen_range(0..max_days * 24 * 60))
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }

    /// Mostly same-currency, often self-transfer reinvestments
    fn generate_legitimate(&mut self) -> TransactionRecord {
        let amount = (self.rng.gen_range(1.0..20_000.0_f64) * 100.0).round() / 100.0;
        let mut tx = TransactionRecord::new(self.timestamp(18), amount, false);

        tx.from_bank = self.rng.gen_range(1..40_000);
        tx.account = self.account();
        if self.rng.gen_bool(0.4) {
            tx.to_bank = tx.from_bank;
            tx.account_1 = tx.account.clone();
        } else {
            tx.to_bank = self.rng.gen_range(1..40_000);
            tx.account_1 = self.account();
        }

        let currency = self.random_choice(&CURRENCIES).to_string();
        tx.receiving_currency = currency.clone();
        tx.payment_currency = currency;
        tx.payment_format = self.random_choice(&FORMATS).to_string();
        tx
    }

    /// Cross-bank transfers clustered early in the month, occasionally
    /// converting currency
    fn generate_suspicious(&mut self) -> TransactionRecord {
        let amount = (self.rng.gen_range(100.0..50_000.0_f64) * 100.0).round() / 100.0;
        let mut tx = TransactionRecord::new(self.timestamp(10), amount, true);

        tx.from_bank = self.rng.gen_range(1..40_000);
        tx.account = self.account();
        tx.to_bank = self.rng.gen_range(1..40_000);
        tx.account_1 = self.account();

        tx.payment_currency = self
            .random_choice(&["US Dollar", "US Dollar", "Euro", "Yuan", "Saudi Riyal"])
            .to_string();
        if self.rng.gen_bool(0.1) {
            tx.receiving_currency = self.random_choice(&CURRENCIES).to_string();
            tx.amount_received = (amount * self.rng.gen_range(0.5..1.5) * 100.0).round() / 100.0;
        } else {
            tx.receiving_currency = tx.payment_currency.clone();
        }
        tx.payment_format = self
            .random_choice(&["ACH", "ACH", "Cheque", "Credit Card"])
            .to_string();
        tx
    }
}

fn write_dataset(
    path: &Path,
    rows: usize,
    rate: f64,
    generator: &mut TransactionGenerator,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    // File header repeats "Account" for the destination column
    let header: Vec<&str> = COLUMN_NAMES
        .iter()
        .map(|&c| if c == "Account.1" { "Account" } else { c })
        .collect();
    writer.write_record(&header)?;

    let mut rng = rand::thread_rng();
    let mut laundering = 0;
    for _ in 0..rows {
        let tx = if rng.gen_bool(rate) {
            laundering += 1;
            generator.generate_suspicious()
        } else {
            generator.generate_legitimate()
        };

        writer.write_record([
            tx.timestamp.format("%Y/%m/%d %H:%M").to_string(),
            format!("{:03}", tx.from_bank),
            tx.account,
            format!("{:03}", tx.to_bank),
            tx.account_1,
            format!("{:.2}", tx.amount_received),
            tx.receiving_currency,
            format!("{:.2}", tx.amount_paid),
            tx.payment_currency,
            tx.payment_format,
            u8::from(tx.is_laundering).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(laundering)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aml_sample_data=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    for rate in [cli.li_rate, cli.hi_rate] {
        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("laundering rate must be within [0, 1], got {}", rate);
        }
    }
    std::fs::create_dir_all(&cli.out_dir)?;

    let mut generator = TransactionGenerator::new()?;
    for (file, rate) in [
        ("LI-Small_Trans.csv", cli.li_rate),
        ("HI-Small_Trans.csv", cli.hi_rate),
    ] {
        let path = cli.out_dir.join(file);
        let laundering = write_dataset(&path, cli.rows, rate, &mut generator)?;
        info!(
            path = %path.display(),
            rows = cli.rows,
            laundering = laundering,
            "Dataset written"
        );
    }

    Ok(())
}
