use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::timeline::{Adjustment, SettingRecord};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn print_settings_table(records: &[SettingRecord]) {
    println!(
        "{:<2}{:<38} {:>12} {:<12} {:<12} {}",
        "", "ID", "LIMIT", "FROM", "UNTIL", "DESCRIPTION"
    );
    println!("{}", "-".repeat(100));

    for record in records {
        let marker = if record.is_active { "*" } else { " " };
        println!(
            "{:<2}{:<38} {:>12} {:<12} {:<12} {}",
            marker,
            record.id,
            record.monthly_limit,
            record.valid_from,
            format_until(record.valid_until),
            record.description
        );
    }
}

pub fn print_adjustments(adjustments: &[Adjustment]) {
    for a in adjustments {
        println!(
            "  {} ({} from {}): {} -> {}",
            a.id,
            a.description,
            a.valid_from,
            format_until(a.previous_valid_until),
            format_until(a.new_valid_until)
        );
    }
}

pub fn format_until(until: Option<chrono::NaiveDate>) -> String {
    until.map(|d| d.to_string()).unwrap_or_else(|| "open".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn open_ended_is_spelled_out() {
        assert_eq!(format_until(None), "open");
        assert_eq!(format_until(NaiveDate::from_ymd_opt(2025, 12, 31)), "2025-12-31");
    }
}
