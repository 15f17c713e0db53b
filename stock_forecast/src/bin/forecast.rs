use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stock_forecast::{prediction, CsvDirectorySource, ForecastConfig, ModelKind};
use tracing_subscriber::EnvFilter;

/// Forecast a ticker's closing price from a directory of CSV histories
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about)]
struct Args {
    /// Directory holding one `<SYMBOL>.csv` per ticker
    #[arg(short = 'd', long)]
    data_dir: PathBuf,

    /// Ticker symbol to forecast
    #[arg(short, long)]
    symbol: String,

    /// Number of periods to forecast
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    days: i64,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured model
    #[arg(short, long, value_enum)]
    model: Option<ModelArg>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Svr,
    Linear,
    Grid,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Svr => ModelKind::Svr,
            ModelArg::Linear => ModelKind::Linear,
            ModelArg::Grid => ModelKind::GridSearch,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_forecast=info,forecast=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ForecastConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    if let Some(model) = args.model {
        config.model = model.into();
    }

    let source = CsvDirectorySource::new(&args.data_dir);
    let chart = prediction(&source, &args.symbol, args.days, &config)
        .with_context(|| format!("forecasting {}", args.symbol))?;

    if let Some(accuracy) = &chart.validation {
        tracing::info!(mae = accuracy.mae, rmse = accuracy.rmse, "hold-out accuracy");
    }

    let json = if args.pretty {
        chart.to_json_pretty()?
    } else {
        chart.to_json()?
    };
    println!("{}", json);

    Ok(())
}
