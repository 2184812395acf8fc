use crate::age::{AgeDetails, calculate_age};
use crate::retirement::{RetirementDetails, calculate_retirement};
use chrono::NaiveDate;
use serde::Serialize;

/// Both calculations for one birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    pub age: AgeDetails,
    pub retirement: RetirementDetails,
}

pub fn calculate(birthdate: NaiveDate, today: NaiveDate, retirement_age: u32) -> CalculationResult {
    CalculationResult {
        age: calculate_age(birthdate, today),
        retirement: calculate_retirement(birthdate, today, retirement_age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn born_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let got = calculate(today, today, 58);
        assert_eq!(
            got.age,
            AgeDetails {
                years: 0,
                months: 0,
                days: 0
            }
        );
        assert_eq!(
            got.retirement.retirement_date,
            NaiveDate::from_ymd_opt(2082, 6, 15).unwrap()
        );
        assert_eq!(
            (
                got.retirement.years_left,
                got.retirement.months_left,
                got.retirement.days_left
            ),
            (58, 0, 0)
        );
    }

    #[test]
    fn serializes_for_json_output() {
        let got = calculate(
            NaiveDate::from_ymd_opt(1960, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            58,
        );
        let json = serde_json::to_value(got).unwrap();
        assert_eq!(json["age"]["years"], 64);
        assert_eq!(json["retirement"]["retirement_date"], "2018-03-10");
        assert_eq!(json["retirement"]["is_retired"], true);
    }
}
