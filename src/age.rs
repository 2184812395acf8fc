//! age.rs
//!
//! Calendar-aware age calculation in the form "X years, Y months, Z days".
//!
//! Chrono does not provide a built-in year/month/day diff (unlike Python’s
//! relativedelta), so the borrowing rules are implemented manually. The same
//! subtraction backs the retirement countdown in `retirement.rs`.
//!
//! Handled here:
//!   • month underflow (borrowing from years)
//!   • day underflow (borrowing from the month before the later date)
//!   • leap years
//!   • varying month lengths

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Elapsed calendar time between a birth date and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeDetails {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl fmt::Display for AgeDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days)
        )
    }
}

/// Age of someone born on `birthdate`, as of `today`.
pub fn calculate_age(birthdate: NaiveDate, today: NaiveDate) -> AgeDetails {
    let (years, months, days) = calendar_diff(birthdate, today);
    AgeDetails {
        years,
        months,
        days,
    }
}

/// Subtracts `earlier` from `later` field by field, borrowing like
/// elementary subtraction with carries.
///
/// Day underflow borrows the length of the month preceding `later`'s month,
/// using `later`'s year/month context. If that month is too short to cover
/// the deficit (a February borrow against a 30th/31st), borrowing continues
/// into the month before it.
pub(crate) fn calendar_diff(earlier: NaiveDate, later: NaiveDate) -> (i32, i32, i32) {
    let mut years = later.year() - earlier.year();
    let mut months = later.month() as i32 - earlier.month() as i32;
    let mut days = later.day() as i32 - earlier.day() as i32;

    // Fix day underflow
    let (mut year, mut month) = (later.year(), later.month());
    while days < 0 {
        months -= 1;
        (year, month) = previous_month(year, month);
        days += days_in_month(year, month) as i32;
    }

    // Fix month underflow
    while months < 0 {
        years -= 1;
        months += 12;
    }

    (years, months, days)
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn plural(n: i32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Returns number of days in a given year/month (handles leap years)
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30, // should never occur but keeps function total
    }
}

/// Leap-year rule (Gregorian):
///   - divisible by 4 → leap year
///   - except divisible by 100 → not leap year
///   - except divisible by 400 → leap year
pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn age(y: i32, m: u32, d: u32) -> AgeDetails {
        AgeDetails {
            years: y,
            months: m as i32,
            days: d as i32,
        }
    }

    #[test]
    fn borrows_days_and_months() {
        let got = calculate_age(date(2000, 1, 1), date(2024, 6, 15));
        assert_eq!(got, age(24, 5, 14));
    }

    #[test]
    fn born_today_is_zero() {
        let today = date(2024, 6, 15);
        assert_eq!(calculate_age(today, today), age(0, 0, 0));
    }

    #[test]
    fn day_before_birthday_borrows_a_year() {
        let got = calculate_age(date(1990, 6, 16), date(2024, 6, 15));
        // May has 31 days
        assert_eq!(got, age(33, 11, 30));
    }

    #[test]
    fn leap_february_borrow_uses_29_days() {
        let got = calculate_age(date(2023, 12, 15), date(2024, 3, 1));
        assert_eq!(got, age(0, 2, 15));

        let got = calculate_age(date(2022, 12, 15), date(2023, 3, 1));
        assert_eq!(got, age(0, 2, 14));
    }

    #[test]
    fn borrow_uses_month_before_today_not_birth_month() {
        // Born on the 31st; today's previous month (April) has 30 days.
        let got = calculate_age(date(2000, 3, 31), date(2024, 5, 2));
        assert_eq!(got, age(24, 1, 1));
    }

    #[test]
    fn short_february_borrow_keeps_borrowing() {
        // One borrow from February 2024 leaves -1 days; January covers the rest.
        let got = calculate_age(date(2024, 1, 31), date(2024, 3, 1));
        assert_eq!(got, age(0, 0, 30));
    }

    #[test]
    fn march_borrow_is_not_monotonic_below_years() {
        let today = date(2019, 3, 15);
        assert_eq!(calculate_age(date(2019, 1, 31), today), age(0, 1, 12));
        assert_eq!(calculate_age(date(2019, 2, 1), today), age(0, 1, 14));
    }

    #[test]
    fn january_borrows_from_previous_december() {
        let got = calculate_age(date(1999, 11, 20), date(2024, 1, 5));
        assert_eq!(got, age(24, 1, 16));
    }

    #[test]
    fn display_uses_singular_forms() {
        assert_eq!(age(1, 1, 1).to_string(), "1 year, 1 month, 1 day");
        assert_eq!(age(24, 5, 0).to_string(), "24 years, 5 months, 0 days");
    }

    #[test]
    fn leap_year_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2100, 1u32..=12, 1u32..=31)
            .prop_map(|(y, m, d)| date(y, m, d.min(days_in_month(y, m))))
    }

    proptest! {
        #[test]
        fn fields_stay_in_range(a in arb_date(), b in arb_date()) {
            let (birth, today) = if a <= b { (a, b) } else { (b, a) };
            let got = calculate_age(birth, today);
            prop_assert!(got.years >= 0);
            prop_assert!((0..12).contains(&got.months));
            prop_assert!((0..31).contains(&got.days));
        }

        // Only whole years are monotonic: borrowing from the month before
        // today lets a later birth date show more days left over in March.
        #[test]
        fn earlier_birth_never_has_fewer_years(a in arb_date(), b in arb_date(), c in arb_date()) {
            let mut dates = [a, b, c];
            dates.sort();
            let [older, younger, today] = dates;
            let older_age = calculate_age(older, today);
            let younger_age = calculate_age(younger, today);
            prop_assert!(older_age.years >= younger_age.years);
        }
    }
}
