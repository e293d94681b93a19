pub mod commands;
pub mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus Events operator CLI - migrations, admin accounts and health checks")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply the embedded database migrations")]
    Migrate,

    #[command(about = "Create or promote admin accounts")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Inspect user accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UsersCommands,
    },

    #[command(about = "Check a running server's /health endpoint")]
    Health {
        #[arg(long, default_value = "http://127.0.0.1:5001", help = "Base URL of the server")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// State built from the same environment the server reads.
pub async fn connect() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    AppState::connect(config).await
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, output_format).await,
        Commands::Users { cmd } => commands::users::handle(cmd, output_format).await,
        Commands::Health { url } => commands::health::handle(&url, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_admin_create() {
        let cli = Cli::try_parse_from([
            "campus", "admin", "create", "--email", "dean@campus.edu", "--password", "pw", "--name", "Dean",
        ])
        .unwrap();
        match cli.command {
            Commands::Admin {
                cmd: commands::admin::AdminCommands::Create { email, name, .. },
            } => {
                assert_eq!(email, "dean@campus.edu");
                assert_eq!(name, "Dean");
            }
            _ => panic!("expected admin create"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["campus", "users", "list", "--json"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
    }

    #[test]
    fn health_has_default_url() {
        let cli = Cli::try_parse_from(["campus", "health"]).unwrap();
        match cli.command {
            Commands::Health { url } => assert_eq!(url, "http://127.0.0.1:5001"),
            _ => panic!("expected health"),
        }
    }
}
