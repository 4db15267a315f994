use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create tables and indexes if they are missing")]
    Init,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Init => {
            let pool = connect().await?;
            DatabaseManager::ensure_schema(&pool).await?;
            DatabaseManager::close(pool).await;
            output_success(&output_format, "Database schema is up to date", None)
        }
    }
}
