use clap::Subcommand;
use serde_json::json;

use crate::cli::{connect, utils::output_success, OutputFormat};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Create an admin account, or promote the account if the email exists")]
    Create {
        #[arg(long, help = "Admin email")]
        email: String,
        #[arg(long, help = "Password for a new account")]
        password: String,
        #[arg(long, help = "Full name for a new account")]
        name: String,
    },

    #[command(about = "Grant admin privilege to an existing account")]
    Promote {
        #[arg(help = "Email of the account")]
        email: String,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = connect().await?;

    match cmd {
        AdminCommands::Create { email, password, name } => {
            let (profile, created) = state.users.ensure_admin(&name, &email, &password).await?;
            let message = if created {
                format!("Admin user created: {}", profile.email)
            } else {
                format!("Admin status updated: {}", profile.email)
            };
            output_success(
                output_format,
                &message,
                Some(json!({ "id": profile.id, "email": profile.email, "created": created })),
            )
        }
        AdminCommands::Promote { email } => {
            let profile = state.users.promote_admin(&email).await?;
            output_success(
                output_format,
                &format!("{} is now an admin", profile.email),
                Some(json!({ "id": profile.id, "email": profile.email })),
            )
        }
    }
}
