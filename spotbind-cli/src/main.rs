//! spotbind: inspect libspotify status codes and the loaded library.
//!
//!   spotbind codes [--json]        List every status code
//!   spotbind classify <value>      Which status a raw value is, if any
//!   spotbind lookup <symbol>       Value of a status symbol
//!   spotbind message <code>        Native message for a status code
//!   spotbind ops [--json]          List the operation catalogue
//!   spotbind build-id              Build id of the loaded library

mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use spotbind::status::from_value;
use spotbind::{enum_value, Binding, ErrorKind, Operation};

#[derive(Parser)]
#[command(name = "spotbind", about = "Inspect libspotify status codes and the native library")]
pub struct Cli {
    /// Path to the libspotify shared library
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Config file (default: ~/.config/spotbind/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every status code
    Codes {
        #[arg(long)]
        json: bool,
    },
    /// Classify a raw status value
    Classify {
        #[arg(allow_hyphen_values = true)]
        value: i32,
    },
    /// Print the value of a status symbol
    Lookup { symbol: String },
    /// Print the native library's message for a status code or symbol
    Message { code: String },
    /// List the operation catalogue
    Ops {
        #[arg(long)]
        json: bool,
    },
    /// Print the build id of the loaded library
    BuildId,
}

#[derive(Serialize)]
struct CodeRow {
    value: i32,
    symbol: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct OpRow {
    name: &'static str,
    symbol: &'static str,
    params: Vec<&'static str>,
    returns: spotbind::Shape,
}

fn parse_status(code: &str) -> Result<ErrorKind> {
    if let Ok(value) = code.parse::<i32>() {
        return from_value(value).with_context(|| format!("{value} is not a known status code"));
    }
    match ErrorKind::from_symbol(code) {
        Some(kind) => Ok(kind),
        None => bail!("invalid error value: {code}"),
    }
}

fn main() -> Result<()> {
    // Use JSON logs when SPOTBIND_LOG_JSON=1, human-readable otherwise
    let json_logs = std::env::var("SPOTBIND_LOG_JSON").unwrap_or_default() == "1";
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "spotbind=warn".into());
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Command::Codes { json } => {
            let rows: Vec<CodeRow> = ErrorKind::ALL
                .iter()
                .map(|k| CodeRow {
                    value: k.value(),
                    symbol: k.symbol(),
                    description: k.description(),
                })
                .collect();
            if *json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!("{:>3}  {:<28} {}", row.value, row.symbol, row.description);
                }
            }
        }
        Command::Classify { value } => match from_value(*value) {
            Some(kind) if kind.is_ok() => println!("{value}: ok"),
            Some(kind) => println!("{value}: {kind} (error): {}", kind.description()),
            None => println!("{value}: unrecognized"),
        },
        Command::Lookup { symbol } => {
            println!("{}", enum_value(symbol, "error value")?);
        }
        Command::Message { code } => {
            let kind = parse_status(code)?;
            let config = config::resolve(&cli);
            match Binding::open(&config) {
                Ok(binding) => {
                    println!("{}", binding.error_message(kind)?);
                    binding.shutdown();
                }
                Err(e) => {
                    tracing::warn!("{e}");
                    println!("{}", kind.description());
                }
            }
        }
        Command::Ops { json } => {
            let rows: Vec<OpRow> = Operation::ALL
                .iter()
                .map(|op| OpRow {
                    name: op.name(),
                    symbol: op.symbol(),
                    params: op.params().iter().map(|p| p.name()).collect(),
                    returns: op.returns(),
                })
                .collect();
            if *json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!(
                        "{:<40} ({}) -> {:?}",
                        row.symbol,
                        row.params.join(", "),
                        row.returns
                    );
                }
            }
        }
        Command::BuildId => {
            let config = config::resolve(&cli);
            let binding = Binding::open(&config)?;
            let id = binding.build_id()?;
            binding.shutdown();
            println!("{}", id.as_deref().unwrap_or("(unknown)"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_number_and_symbol() {
        assert_eq!(parse_status("8").unwrap(), ErrorKind::UnableToContactServer);
        assert_eq!(parse_status("user_banned").unwrap(), ErrorKind::UserBanned);
    }

    #[test]
    fn test_parse_status_rejects_unknown() {
        assert!(parse_status("4").is_err());
        let err = parse_status("moo").unwrap_err();
        assert_eq!(err.to_string(), "invalid error value: moo");
    }

    #[test]
    fn test_cli_parses_global_library() {
        let cli = Cli::try_parse_from(["spotbind", "build-id", "--library", "/opt/libspotify.so"]).unwrap();
        assert_eq!(cli.library, Some(PathBuf::from("/opt/libspotify.so")));
        assert!(matches!(cli.command, Command::BuildId));
    }

    #[test]
    fn test_cli_classify_negative() {
        let cli = Cli::try_parse_from(["spotbind", "classify", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Classify { value: -1 }));
    }
}
