//! # darkroom CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use darkroom_cache::CacheConfig;
use tracing_subscriber::EnvFilter;

use darkroom_cli::code::{run_code, CodeArgs};
use darkroom_cli::media::{run_fetch, run_purge, FetchArgs, PurgeArgs};
use darkroom_cli::phase::{run_phase, PhaseArgs};

/// Darkroom event core tooling.
#[derive(Parser, Debug)]
#[command(name = "darkroom", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate an event record's phase and gate decisions.
    Phase(PhaseArgs),

    /// Fetch a media URL through the two-tier cache.
    Fetch(FetchArgs),

    /// Remove cached media.
    Purge(PurgeArgs),

    /// Draw join codes.
    Code(CodeArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Phase(args) => run_phase(&args),
        Commands::Code(args) => run_code(&args),
        Commands::Fetch(args) => match cache_config() {
            Ok(config) => run_fetch(&args, &config).await,
            Err(e) => Err(e),
        },
        Commands::Purge(args) => match cache_config() {
            Ok(config) => run_purge(&args, &config).await,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity picks the level.
fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn cache_config() -> anyhow::Result<CacheConfig> {
    Ok(CacheConfig::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_phase_with_now() {
        let cli = Cli::try_parse_from([
            "darkroom",
            "phase",
            "event.json",
            "--now",
            "2026-06-01T12:00:00Z",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Phase(args) => {
                assert_eq!(args.event.to_str(), Some("event.json"));
                assert_eq!(args.now.as_deref(), Some("2026-06-01T12:00:00Z"));
                assert!(args.json);
            }
            other => panic!("expected phase, got {other:?}"),
        }
    }

    #[test]
    fn parse_purge_disk_only() {
        let cli = Cli::try_parse_from(["darkroom", "purge", "--disk-only"]).unwrap();
        assert!(matches!(cli.command, Commands::Purge(PurgeArgs { disk_only: true })));
    }

    #[test]
    fn parse_fetch_with_output_and_global_flags() {
        let cli = Cli::try_parse_from([
            "darkroom",
            "fetch",
            "https://cdn.example.com/a.jpg",
            "-o",
            "a.jpg",
            "-vv",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Fetch(_)));
    }

    #[test]
    fn code_count_defaults_to_one_and_is_bounded() {
        let cli = Cli::try_parse_from(["darkroom", "code"]).unwrap();
        match cli.command {
            Commands::Code(args) => assert_eq!(args.count, 1),
            other => panic!("expected code, got {other:?}"),
        }
        assert!(Cli::try_parse_from(["darkroom", "code", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["darkroom", "code", "-n", "20000"]).is_err());
    }
}
