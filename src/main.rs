//! AML Dashboard - Main Entry Point
//!
//! Loads both transaction datasets once, then either answers a single
//! command (`analyze`, `predict`, `currencies`) or runs an interactive
//! session on stdin.

use aml_dashboard::{
    config::AppConfig,
    form::{FormField, PredictionForm},
    models::{init_runtime, InferenceEngine, ModelSource, OnnxModelSource},
    render,
    repository::DataRepository,
    session::{Reply, Session, HELP},
    AnalyticsReport, CurrencySelection,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "aml-dashboard",
    version,
    about = "Explore AML transactions and score single transfers"
)]
struct Cli {
    /// Configuration file (defaults to config/config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default)
    Session,
    /// Print the analytics page once
    Analyze {
        /// Payment currency to include; repeat for several, omit for all
        #[arg(long = "currency")]
        currencies: Vec<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Score one transaction
    Predict(PredictArgs),
    /// List the payment currencies available to the filter
    Currencies,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// YYYY-MM-DD HH:MM
    #[arg(long)]
    timestamp: String,
    #[arg(long)]
    from_bank: String,
    /// Hexadecimal
    #[arg(long)]
    from_account: String,
    #[arg(long)]
    to_bank: String,
    /// Hexadecimal
    #[arg(long)]
    to_account: String,
    #[arg(long)]
    amount_received: String,
    #[arg(long)]
    receiving_currency: String,
    #[arg(long)]
    amount_paid: String,
    #[arg(long)]
    payment_currency: String,
    #[arg(long)]
    payment_format: String,
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

impl PredictArgs {
    fn form(&self) -> PredictionForm {
        PredictionForm::new()
            .with(FormField::Timestamp, &self.timestamp)
            .with(FormField::FromBank, &self.from_bank)
            .with(FormField::FromAccount, &self.from_account)
            .with(FormField::ToBank, &self.to_bank)
            .with(FormField::ToAccount, &self.to_account)
            .with(FormField::AmountReceived, &self.amount_received)
            .with(FormField::ReceivingCurrency, &self.receiving_currency)
            .with(FormField::AmountPaid, &self.amount_paid)
            .with(FormField::PaymentCurrency, &self.payment_currency)
            .with(FormField::PaymentFormat, &self.payment_format)
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("aml_dashboard={}", config.logging.level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    init_logging(&config)?;
    info!("Starting AML Dashboard");

    // Load both datasets once for the process lifetime
    let repo =
        DataRepository::load(&config.data).context("Failed to load transaction datasets")?;
    info!(
        li_small = repo.li_small().len(),
        hi_small = repo.hi_small().len(),
        "Datasets loaded"
    );

    init_runtime().context("Failed to initialize ONNX Runtime")?;
    let models = OnnxModelSource::new(&config.model);

    match cli.command.unwrap_or(Command::Session) {
        Command::Session => run_session(&repo, &models, &config).await,
        Command::Analyze { currencies, json } => {
            let selection = CurrencySelection::resolve(currencies, &repo.currency_options())
                .context("Invalid --currency filter")?;
            let report = AnalyticsReport::build(&repo, &selection);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_analytics(&report));
            }
            Ok(())
        }
        Command::Predict(args) => {
            let classifier = models.load()?;
            let mut engine =
                InferenceEngine::from_config(repo.li_small(), classifier, &config.model);
            let report = engine.predict(&args.form())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_prediction(&report));
            }
            Ok(())
        }
        Command::Currencies => {
            for currency in repo.currency_options() {
                println!("{}", currency);
            }
            Ok(())
        }
    }
}

async fn run_session(
    repo: &DataRepository,
    models: &dyn ModelSource,
    config: &AppConfig,
) -> Result<()> {
    let mut session = Session::new(repo, models, config.model.clone());
    let mut stdout = std::io::stdout();

    print!("{}", session.render());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("[{}]> ", session.page());
        stdout.flush()?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read input");
                break;
            }
        };

        match session.handle_line(&line) {
            Reply::Output(text) => print!("{}", text),
            Reply::Quit => break,
        }
    }

    info!("Session closed");
    Ok(())
}
