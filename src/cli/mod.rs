//! CLI module for cvedash.
//!
//! - Argument parsing
//! - Command handlers that drive the dashboard core
//! - Plain-text rendering of lists and charts
//!
//! # Usage
//!
//! ```ignore
//! use cvedash::cli::{parse_args, run_cli_command, CommandContext};
//! use cvedash::config::DashboardConfig;
//!
//! let args = parse_args(std::env::args())?;
//! let ctx = CommandContext::from_config(DashboardConfig::from_env());
//! run_cli_command(&ctx, args.command).await?;
//! ```

pub mod args;
pub mod commands;
pub mod render;
pub mod version;

pub use args::{parse_args, ArgsError, CliArgs, CliCommand, USAGE};
pub use commands::CommandContext;
pub use version::{version_line, VERSION};

use color_eyre::Result;

use crate::traits::HttpClient;

/// Execute a parsed command.
pub async fn run_cli_command<C: HttpClient + Clone + 'static>(
    ctx: &CommandContext<C>,
    command: CliCommand,
) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Login { email } => commands::handle_login(ctx, email).await,
        CliCommand::Register { email } => commands::handle_register(ctx, email).await,
        CliCommand::Logout => commands::handle_logout(ctx),
        CliCommand::Whoami => commands::handle_whoami(ctx),
        CliCommand::List { page, filter } => commands::handle_list(ctx, page, filter).await,
        CliCommand::Stats => commands::handle_stats(ctx).await,
        CliCommand::Export { filter } => commands::handle_export(ctx, filter).await,
        CliCommand::Status => commands::handle_status(ctx).await,
    }
}
