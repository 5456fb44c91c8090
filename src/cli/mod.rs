pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Local server unless `--url` or `STOREFRONT_API_URL` says otherwise
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "console")]
#[command(about = "Storefront admin console - tokens, search and health checks")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a signed development token")]
    Token(commands::token::TokenArgs),

    #[command(about = "Run an admin search against a server")]
    Search(commands::search::SearchArgs),

    #[command(about = "Check server health from the /health endpoint")]
    Health(commands::health::HealthArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Search(args) => commands::search::handle(args, output_format).await,
        Commands::Health(args) => commands::health::handle(args, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_with_global_json() {
        let cli = Cli::try_parse_from(["console", "search", "chair", "--json", "--token", "abc"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.query, "chair");
                assert_eq!(args.token.as_deref(), Some("abc"));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn token_requires_user() {
        assert!(Cli::try_parse_from(["console", "token"]).is_err());
    }
}
