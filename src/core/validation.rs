//! Validation utilities for configuration and CLI arguments

use std::time::Duration;

/// Validate a staleness window expressed in seconds
///
/// Returns `None` for `0` (reaping disabled) and an error for negative values.
pub fn validate_stale_seconds(stale_seconds: i64) -> Result<Option<Duration>, String> {
    match stale_seconds {
        s if s < 0 => Err(format!(
            "Stale time must be zero or a positive number of seconds, got {}",
            s
        )),
        0 => Ok(None),
        s => Ok(Some(Duration::from_secs(s as u64))),
    }
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a sub scope used to create a queue
///
/// Sub scopes are joined to the set scope with `.`; an empty sub scope
/// would make the queue indistinguishable from the set itself.
pub fn validate_sub_scope(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Sub scope cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stale_seconds() {
        assert_eq!(validate_stale_seconds(0).unwrap(), None);
        assert_eq!(
            validate_stale_seconds(60).unwrap(),
            Some(Duration::from_secs(60))
        );
        assert!(validate_stale_seconds(-1).is_err());
        assert!(validate_stale_seconds(i64::MIN).is_err());
    }

    #[test]
    fn test_validate_positive_int() {
        assert_eq!(validate_positive_int("5").unwrap(), 5);
        assert_eq!(validate_positive_int("100").unwrap(), 100);
        assert!(validate_positive_int("0").is_err());
        assert!(validate_positive_int("-5").is_err());
        assert!(validate_positive_int("not_a_number").is_err());
    }

    #[test]
    fn test_validate_sub_scope() {
        assert_eq!(validate_sub_scope("rooms/a").unwrap(), "rooms/a");
        assert_eq!(validate_sub_scope("  lobby ").unwrap(), "lobby");
        assert!(validate_sub_scope("").is_err());
        assert!(validate_sub_scope("   ").is_err());
    }
}
