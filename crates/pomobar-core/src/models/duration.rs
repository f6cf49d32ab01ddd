//! Parsing of user-supplied durations

use crate::{Error, Result};

/// Parse a minutes value typed by the user. Only whole, positive numbers
/// are accepted; surrounding whitespace is ignored.
pub fn parse_minutes(input: &str) -> Result<u64> {
    let trimmed = input.trim();

    let minutes: u64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidDurationInput(format!("'{}' is not a whole number", trimmed)))?;

    if minutes == 0 {
        return Err(Error::InvalidDurationInput(
            "duration must be greater than 0".to_string(),
        ));
    }

    Ok(minutes)
}

pub fn minutes_to_seconds(minutes: u64) -> Result<u64> {
    if minutes == 0 {
        return Err(Error::InvalidDurationInput(
            "duration must be greater than 0".to_string(),
        ));
    }

    minutes
        .checked_mul(60)
        .ok_or_else(|| Error::InvalidDurationInput(format!("{} minutes is too long", minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_minutes() {
        assert_eq!(parse_minutes("10").unwrap(), 10);
        assert_eq!(parse_minutes(" 25 ").unwrap(), 25);
        assert_eq!(parse_minutes("1").unwrap(), 1);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for input in ["abc", "", "   ", "0", "-5", "1.5", "10abc"] {
            let err = parse_minutes(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDurationInput(_)),
                "expected rejection for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_minutes_to_seconds() {
        assert_eq!(minutes_to_seconds(45).unwrap(), 2700);
        assert!(minutes_to_seconds(0).is_err());
        assert!(minutes_to_seconds(u64::MAX).is_err());
    }
}
