use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleet_sync::presentation::cli::{Cli, CliApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (RUST_LOG wins over --verbose)
    let default_filter = if cli.verbose { "fleet_sync=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .init();

    // Run the CLI application
    let app = CliApp::from_cli(cli);
    app.run().await
}
