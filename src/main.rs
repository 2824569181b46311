use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use tracing_subscriber::EnvFilter;

use campus_parking::{
    app::{self, App},
    config::AppConfig,
    routes::Route,
};

/// Campus parking companion: building map, live lot occupancy, parking map
#[derive(Debug, Parser)]
#[command(name = "campus-parking", version)]
struct Cli {
    /// Screen to open: /, /map, /parkingmap, /brown or /witherspoon
    #[arg(default_value = "/")]
    route: Route,

    /// Config file (default: ~/.config/campus-parking/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Occupancy backend base address
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds between occupancy refreshes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_secs: Option<u64>,

    /// Disable coloured status text
    #[arg(long)]
    no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }
    if let Some(secs) = cli.poll_secs {
        config.poll_interval_secs = secs;
    }
    config.validate()?;
    tracing::debug!("configuration: {:?}", config);

    let color = !cli.no_color && std::io::stdout().is_tty();
    let app = App::new(config).with_color(color);
    let mut input = app::stdin_lines();
    let mut stdout = std::io::stdout();

    tokio::select! {
        result = app.run(cli.route, &mut input, &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    Ok(())
}
