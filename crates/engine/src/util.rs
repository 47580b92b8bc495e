//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Trim a required name and reject it when nothing is left.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be a finite number"
        )));
    }
    Ok(value)
}

/// Reject NaN, infinities and values below zero.
pub(crate) fn ensure_non_negative(value: f64, label: &str) -> ResultEngine<f64> {
    ensure_finite(value, label)?;
    if value < 0.0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(value)
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidValue(format!("invalid {label} id")))
}
