use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{SettingInput, TimelineError};

pub const MIN_DESCRIPTION_CHARS: usize = 3;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_FRACTION_DIGITS: u32 = 2;

/// Upper bound for `monthly_limit`: 999,999.99.
pub fn max_monthly_limit() -> Decimal {
    Decimal::new(99_999_999, 2)
}

/// Check every field of `input` and return it with the description trimmed.
///
/// All violations are collected into one `Validation` error so the caller can
/// show them together.
pub fn validate_input(input: SettingInput) -> Result<SettingInput, TimelineError> {
    let mut field_errors = HashMap::new();

    if input.monthly_limit.is_sign_negative() && !input.monthly_limit.is_zero() {
        field_errors.insert("monthlyLimit".to_string(), "Limit must not be negative".to_string());
    } else if input.monthly_limit > max_monthly_limit() {
        field_errors.insert(
            "monthlyLimit".to_string(),
            format!("Limit must not exceed {}", max_monthly_limit()),
        );
    } else if input.monthly_limit.normalize().scale() > MAX_FRACTION_DIGITS {
        field_errors.insert(
            "monthlyLimit".to_string(),
            format!("Limit allows at most {} decimal places", MAX_FRACTION_DIGITS),
        );
    }

    let description = input.description.trim().to_string();
    let length = description.chars().count();
    if length < MIN_DESCRIPTION_CHARS || length > MAX_DESCRIPTION_CHARS {
        field_errors.insert(
            "description".to_string(),
            format!(
                "Description must be between {} and {} characters",
                MIN_DESCRIPTION_CHARS, MAX_DESCRIPTION_CHARS
            ),
        );
    }

    if let Some(until) = input.valid_until {
        if until <= input.valid_from {
            field_errors.insert(
                "validUntil".to_string(),
                "End date must be after the start date".to_string(),
            );
        }
    }

    if !field_errors.is_empty() {
        return Err(TimelineError::Validation {
            message: "Invalid setting".to_string(),
            field_errors,
        });
    }

    let mut monthly_limit = input.monthly_limit.round_dp(MAX_FRACTION_DIGITS);
    monthly_limit.rescale(MAX_FRACTION_DIGITS);

    Ok(SettingInput {
        monthly_limit,
        description,
        ..input
    })
}
