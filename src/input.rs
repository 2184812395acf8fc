//! Birth date parsing and validation.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a valid date of birth in the past. (could not parse {0:?}, expected YYYY-MM-DD)")]
    Unparseable(String),
    #[error("Please enter a valid date of birth in the past. ({0} is in the future)")]
    InFuture(NaiveDate),
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| InputError::Unparseable(trimmed.to_string()))
}

/// Parses a birth date and rejects anything later than `today`.
pub fn parse_birth_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    let birthdate = parse_date(raw)?;
    if birthdate > today {
        return Err(InputError::InFuture(birthdate));
    }
    Ok(birthdate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn accepts_past_and_present() {
        assert_eq!(
            parse_birth_date(" 2000-01-01\n", today()),
            Ok(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        assert_eq!(parse_birth_date("2024-06-15", today()), Ok(today()));
    }

    #[test]
    fn rejects_future() {
        let err = parse_birth_date("2024-06-16", today()).unwrap_err();
        assert_eq!(
            err,
            InputError::InFuture(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap())
        );
        assert!(
            err.to_string()
                .starts_with("Please enter a valid date of birth in the past.")
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        for raw in ["", "yesterday", "2023-02-29", "2024-13-01", "15/06/2000"] {
            let err = parse_birth_date(raw, today()).unwrap_err();
            assert!(matches!(err, InputError::Unparseable(_)), "{raw}");
        }
    }
}
