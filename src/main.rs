use color_eyre::Result;
use cvedash::cli::{parse_args, run_cli_command, CommandContext, USAGE};
use cvedash::config::DashboardConfig;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout only carries command output.
fn init_tracing(debug: bool) {
    let default_filter = if debug { "cvedash=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    init_tracing(args.debug);

    let config = DashboardConfig::from_env().with_debug(args.debug);
    tracing::debug!("Using backend {}", config.api_url);
    let ctx = CommandContext::from_config(config);

    if let Err(e) = run_cli_command(&ctx, args.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
