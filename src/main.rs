// Entrypoint for the CLI application.
// - Parses arguments and sets up logging before any prompt is shown, so a
//   bad page range fails without touching the network.
// - Returns `anyhow::Result`; an authentication failure exits non-zero.

use clap::Parser;
use gtin_fetch_cli::{config::CliArgs, ui};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Diagnostics go to stderr; `RUST_LOG=gtin_fetch_cli=debug` shows every request.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gtin_fetch_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.to_config();
    let credentials = ui::prompt_credentials()?;
    ui::run(&config, credentials)?;
    Ok(())
}
