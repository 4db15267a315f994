use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use std::sync::Arc;

use crate::cli::utils::*;
use crate::cli::{connect, OutputFormat};
use crate::config;
use crate::database::PgSettingStore;
use crate::services::SettingService;
use crate::timeline::Clock;

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "List every setting, newest first")]
    List,

    #[command(about = "Show the setting in effect")]
    Current {
        #[arg(long, help = "Evaluate for this day (YYYY-MM-DD) instead of today")]
        date: Option<NaiveDate>,
    },

    #[command(about = "Rebuild all end dates from chronological order")]
    Recalculate,

    #[command(about = "Re-derive the active flag for today")]
    Refresh,
}

pub async fn handle(cmd: SettingsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let pool = connect().await?;
    let service = SettingService::new(Arc::new(PgSettingStore::new(pool)))
        .with_audit(config.security.enable_audit_logging);
    let today = Clock::System(config.timeline.reference_offset()).today();

    match cmd {
        SettingsCommands::List => {
            let records = service.list().await?;
            if records.is_empty() {
                return output_empty_collection(&output_format, "settings", "No settings recorded");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "settings": records }))?);
                }
                OutputFormat::Text => print_settings_table(&records),
            }
            Ok(())
        }
        SettingsCommands::Current { date } => {
            let day = date.unwrap_or(today);
            let current = service.current(day).await?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({ "date": day, "current_setting": current }))?
                    );
                }
                OutputFormat::Text => match current {
                    Some(record) => {
                        println!("Current setting on {}: {} ({})", day, record.monthly_limit, record.description);
                        println!("Valid: {} .. {}", record.valid_from, format_until(record.valid_until));
                        println!("ID: {}", record.id);
                    }
                    None => println!("No setting is in effect on {}", day),
                },
            }
            Ok(())
        }
        SettingsCommands::Recalculate => {
            let outcome = service.recalculate(None, today).await?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Timeline recalculated",
                    Some(serde_json::to_value(&outcome)?),
                ),
                OutputFormat::Text => {
                    println!("✓ Timeline recalculated: {} record(s) changed", outcome.changed_count);
                    print_adjustments(&outcome.changes);
                    Ok(())
                }
            }
        }
        SettingsCommands::Refresh => {
            let active = service.refresh_active(today).await?;
            let message = match &active {
                Some(record) => format!("Active setting: {} ({})", record.monthly_limit, record.description),
                None => format!("No setting is in effect on {}", today),
            };
            output_success(&output_format, &message, Some(serde_json::to_value(&active)?))
        }
    }
}
