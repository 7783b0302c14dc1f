use garde::Validate;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Runs the payload's garde rules, reporting every missing field at once.
pub fn require<T: Validate<Context = ()>>(payload: &T) -> Result<()> {
    payload.validate().map_err(|report| {
        let mut fields: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
        fields.dedup();
        AppError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    })
}

/// Parses an optional `limit` query parameter; it must be a positive integer.
pub fn parse_limit(limit: Option<&str>) -> Result<Option<usize>> {
    match limit {
        None | Some("") => Ok(None),
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(AppError::Validation("limit must be a positive integer".to_string())),
        },
    }
}

/// Parses a boolean flag given as `true`/`1`; anything else reads as unset.
pub fn parse_flag(flag: Option<&str>) -> bool {
    matches!(flag, Some("true") | Some("1"))
}

/// Parses an enum-valued field, turning the parse error into a validation error.
pub fn parse_enum<E: FromStr<Err = String>>(value: &str) -> Result<E> {
    value.parse::<E>().map_err(AppError::Validation)
}
