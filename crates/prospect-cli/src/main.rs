use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prospect_core::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "prospect",
    version,
    about = "Route natural-language company, person and job searches to a data provider"
)]
struct Cli {
    /// Config file (default: the user config dir's prospect/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Listen address, overrides server.listen_addr
        #[arg(long)]
        bind: Option<String>,
    },
    /// Classify a query and run the matching search
    Search {
        query: String,
        /// Go through the gateway instead of calling the provider directly
        #[arg(long)]
        via_gateway: bool,
    },
    /// Show how a query would be classified, without searching
    Classify { query: String },
    /// Print tool declarations
    Tools,
    /// Invoke a tool adapter with JSON arguments
    Call {
        tool: String,
        #[arg(long, default_value = "{}")]
        args: String,
        #[arg(long)]
        via_gateway: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config =
        Config::load_with_file(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Serve { bind } => commands::serve::run(&config, bind.as_deref()).await,
        Commands::Search { query, via_gateway } => {
            commands::search::run(&config, &query, via_gateway).await
        }
        Commands::Classify { query } => commands::classify::run(&config, &query).await,
        Commands::Tools => commands::tools::run(),
        Commands::Call {
            tool,
            args,
            via_gateway,
        } => commands::call::run(&config, &tool, &args, via_gateway).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_search_with_flags() {
        let cli = Cli::try_parse_from([
            "prospect",
            "--config",
            "/tmp/p.toml",
            "search",
            "Find remote jobs",
            "--via-gateway",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        match cli.command {
            Commands::Search { query, via_gateway } => {
                assert_eq!(query, "Find remote jobs");
                assert!(via_gateway);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn call_defaults_to_empty_arguments() {
        let cli = Cli::try_parse_from(["prospect", "call", "job_search"]).unwrap();
        match cli.command {
            Commands::Call { tool, args, .. } => {
                assert_eq!(tool, "job_search");
                assert_eq!(args, "{}");
            }
            _ => panic!("expected call"),
        }
    }
}
