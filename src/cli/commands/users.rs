use clap::Subcommand;

use crate::cli::{connect, utils::format_table, OutputFormat};

#[derive(Subcommand)]
pub enum UsersCommands {
    #[command(about = "List all user accounts")]
    List,
}

pub async fn handle(cmd: UsersCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = connect().await?;

    match cmd {
        UsersCommands::List => {
            let users = state.users.list_users().await?;
            let admins = state.users.admins();

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
                OutputFormat::Text if users.is_empty() => println!("No users found"),
                OutputFormat::Text => {
                    let rows: Vec<Vec<String>> = users
                        .iter()
                        .map(|u| {
                            let admin = if u.is_admin {
                                "yes"
                            } else if admins.contains(&u.email) {
                                "yes (allow-list)"
                            } else {
                                "no"
                            };
                            vec![
                                u.id.to_string(),
                                u.email.clone(),
                                u.full_name.clone(),
                                admin.to_string(),
                                u.created_at.format("%Y-%m-%d").to_string(),
                            ]
                        })
                        .collect();
                    println!("{}", format_table(&["ID", "EMAIL", "NAME", "ADMIN", "CREATED"], &rows));
                }
            }
            Ok(())
        }
    }
}
