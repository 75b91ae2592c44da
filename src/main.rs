use anyhow::Context;
use clap::Parser;
use pricelens::config::{resolve_base, Config};
use pricelens::session::{PredictionSession, StatusSink};
use pricelens::{FormData, PredictClient};
use tracing_subscriber::EnvFilter;

/// Submits car features to the price prediction backend and prints the
/// estimate. Fields are given as `name=value` pairs, e.g.
/// `pricelens year=2020 mileage=30000 brand=Toyota`.
#[derive(Parser, Debug)]
#[command(name = "pricelens", version, about)]
struct Cli {
    /// Origin used to pick the backend: loopback hosts get the local
    /// development server, anything else the deployed one.
    #[arg(long)]
    origin: Option<String>,

    /// Backend base URL, overriding origin resolution entirely.
    #[arg(long)]
    base: Option<String>,

    /// Probe the backend's /health endpoint instead of predicting.
    #[arg(long)]
    health: bool,

    /// Form fields as name=value pairs.
    #[arg(value_name = "FIELD=VALUE")]
    fields: Vec<String>,
}

struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn submit_started(&self) {
        println!("Predicting...");
    }

    fn submit_finished(&self, rendered: &str) {
        println!("{rendered}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let base = match (cli.base, cli.origin) {
        (Some(base), _) => base,
        (None, Some(origin)) => resolve_base(&origin),
        (None, None) => Config::from_env().api_base,
    };
    let client = PredictClient::new(base);

    if cli.health {
        match client.health().await {
            Ok(health) => match health.model {
                Some(model) => println!("Backend {} (model: {model})", health.status),
                None => println!("Backend {}", health.status),
            },
            Err(err) => println!("Error: {err}"),
        }
        return Ok(());
    }

    let form = FormData::from_args(&cli.fields).context("invalid form field")?;
    let session = PredictionSession::new(client);

    // Request failures come back as rendered text, already printed by the
    // sink; only an overlapping submission would error here.
    session.submit(&form, &ConsoleSink).await?;
    Ok(())
}
