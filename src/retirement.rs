//! Retirement date and countdown.
//!
//! The retirement date is the birth date advanced by a fixed service length
//! in years. Until that date is reached, the remaining time is decomposed with
//! the same borrowing rules as [`crate::age`], borrowing from the month that
//! precedes the retirement date.

use crate::age::{calendar_diff, is_leap_year};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Service limit in years.
pub const DEFAULT_RETIREMENT_AGE: u32 = 58;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetirementDetails {
    pub retirement_date: NaiveDate,
    pub years_left: i32,
    pub months_left: i32,
    pub days_left: i32,
    pub is_retired: bool,
}

impl RetirementDetails {
    pub fn retirement_year(&self) -> i32 {
        self.retirement_date.year()
    }
}

/// Returns `date` with its year advanced by `years`, keeping month and day.
///
/// A Feb 29 that lands on a common year rolls forward to March 1.
pub fn anniversary(date: NaiveDate, years: u32) -> NaiveDate {
    let Some(year) = i32::try_from(years)
        .ok()
        .and_then(|n| date.year().checked_add(n))
    else {
        return NaiveDate::MAX;
    };

    let (month, day) = if date.month() == 2 && date.day() == 29 && !is_leap_year(year) {
        (3, 1)
    } else {
        (date.month(), date.day())
    };

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}

pub fn calculate_retirement(
    birthdate: NaiveDate,
    today: NaiveDate,
    retirement_age: u32,
) -> RetirementDetails {
    let retirement_date = anniversary(birthdate, retirement_age);

    if today >= retirement_date {
        return RetirementDetails {
            retirement_date,
            years_left: 0,
            months_left: 0,
            days_left: 0,
            is_retired: true,
        };
    }

    let (years_left, months_left, days_left) = calendar_diff(today, retirement_date);
    RetirementDetails {
        retirement_date,
        years_left,
        months_left,
        days_left,
        is_retired: false,
    }
}
