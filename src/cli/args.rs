//! Command-line argument parsing for the cvedash CLI.

use thiserror::Error;

use crate::state::Filter;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in; the password is prompted for
    Login { email: Option<String> },
    /// Create an account
    Register { email: Option<String> },
    Logout,
    /// Show who is signed in
    Whoami,
    /// One page of change events
    List { page: u32, filter: Filter },
    /// Aggregate charts
    Stats,
    /// Save the filtered catalog as CSV
    Export { filter: Filter },
    /// Backend health
    Status,
}

/// A command plus global flags.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub command: CliCommand,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unexpected argument '{arg}' for '{command}'")]
    UnexpectedArgument { command: &'static str, arg: String },
    #[error("'{0}' needs a value")]
    MissingValue(String),
    #[error("invalid page number '{0}'")]
    InvalidPage(String),
}

pub const USAGE: &str = "\
Usage: cvedash [--debug] <command>

Commands:
  login [email]                                 Sign in (password is prompted)
  register [email]                              Create an account
  logout                                        End the session
  whoami                                        Show the signed-in account
  list [--page N] [--cve-id X] [--event-name Y] Show one page of change events
  stats                                         Show event counts per name and month
  export [--cve-id X] [--event-name Y]          Save matching events to cve_data.csv
  status                                        Check the backend

Options:
  --debug          Log to stderr
  -V, --version    Show version
  -h, --help       Show this help

Environment:
  CVEDASH_API_URL      Backend URL (default http://localhost:8000)
  CVEDASH_EXPORT_DIR   Directory for exports (default: current directory)
  CVEDASH_SESSION_DIR  Session token directory (default: runtime directory)";

/// Parse command-line arguments. The first item is the program name.
///
/// ```
/// use cvedash::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["cvedash".to_string(), "stats".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap().command, CliCommand::Stats);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut debug = false;
    let mut rest = Vec::new();
    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                return Ok(CliArgs {
                    command: CliCommand::Version,
                    debug,
                })
            }
            "--help" | "-h" => {
                return Ok(CliArgs {
                    command: CliCommand::Help,
                    debug,
                })
            }
            "--debug" => debug = true,
            _ => rest.push(arg),
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        None | Some("help") => CliCommand::Help,
        Some("login") => CliCommand::Login {
            email: optional_positional("login", &mut rest)?,
        },
        Some("register") => CliCommand::Register {
            email: optional_positional("register", &mut rest)?,
        },
        Some("logout") => no_arguments("logout", &mut rest, CliCommand::Logout)?,
        Some("whoami") => no_arguments("whoami", &mut rest, CliCommand::Whoami)?,
        Some("stats") => no_arguments("stats", &mut rest, CliCommand::Stats)?,
        Some("status") => no_arguments("status", &mut rest, CliCommand::Status)?,
        Some("list") => {
            let (page, filter) = parse_query("list", &mut rest, true)?;
            CliCommand::List {
                page: page.unwrap_or(1),
                filter,
            }
        }
        Some("export") => {
            let (_, filter) = parse_query("export", &mut rest, false)?;
            CliCommand::Export { filter }
        }
        Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    Ok(CliArgs { command, debug })
}

fn optional_positional(
    command: &'static str,
    rest: &mut impl Iterator<Item = String>,
) -> Result<Option<String>, ArgsError> {
    let value = rest.next();
    if let Some(arg) = rest.next() {
        return Err(ArgsError::UnexpectedArgument { command, arg });
    }
    Ok(value)
}

fn no_arguments(
    command: &'static str,
    rest: &mut impl Iterator<Item = String>,
    parsed: CliCommand,
) -> Result<CliCommand, ArgsError> {
    match rest.next() {
        Some(arg) => Err(ArgsError::UnexpectedArgument { command, arg }),
        None => Ok(parsed),
    }
}

/// `--page`, `--cve-id` and `--event-name`, each as `--flag value` or
/// `--flag=value`.
fn parse_query(
    command: &'static str,
    rest: &mut impl Iterator<Item = String>,
    allow_page: bool,
) -> Result<(Option<u32>, Filter), ArgsError> {
    let mut page = None;
    let mut filter = Filter::default();

    while let Some(arg) = rest.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| rest.next())
                .ok_or_else(|| ArgsError::MissingValue(flag.clone()))
        };

        match flag.as_str() {
            "--page" if allow_page => {
                let raw = value()?;
                let n = raw
                    .parse::<u32>()
                    .map_err(|_| ArgsError::InvalidPage(raw.clone()))?;
                page = Some(n);
            }
            "--cve-id" => filter.cve_id = value()?,
            "--event-name" => filter.event_name = value()?,
            _ => return Err(ArgsError::UnexpectedArgument { command, arg }),
        }
    }

    Ok((page, filter))
}
