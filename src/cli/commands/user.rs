use clap::Subcommand;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};
use crate::config;
use crate::database::models::Role;
use crate::database::PgUserStore;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an account")]
    Create {
        #[arg(help = "Login name")]
        username: String,

        #[arg(long, help = "Initial password (at least 8 characters)")]
        password: String,

        #[arg(long, default_value = "employee", help = "admin or employee")]
        role: Role,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { username, password, role } => {
            let pool = connect().await?;
            let auth = AuthService::new(Arc::new(PgUserStore::new(pool)), &config::config().security)?;

            let user = auth.create_user(&username, &password, role).await?;
            output_success(
                &output_format,
                &format!("Created {} account '{}'", user.role, user.username),
                Some(serde_json::to_value(&user)?),
            )
        }
    }
}
