use chrono::{NaiveDate, Utc};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

/// Single entry point for payload validation. Every create/update handler
/// funnels its typed payload through here before anything is forwarded
/// upstream.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|errors| ApiError::Validation(flatten_errors(&errors)))
}

fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{field}: {detail}")
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Expiration dates may be today or later; a date already in the past is a
/// data-entry mistake.
pub fn not_past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < Utc::now().date_naive() {
        let mut err = ValidationError::new("past_date");
        err.message = Some("date must not be in the past".into());
        return Err(err);
    }
    Ok(())
}

/// Inventory transactions record a signed movement; a zero change is
/// meaningless in the audit trail.
pub fn nonzero_change(change: i64) -> Result<(), ValidationError> {
    if change == 0 {
        let mut err = ValidationError::new("zero_change");
        err.message = Some("quantity change must not be zero".into());
        return Err(err);
    }
    Ok(())
}
