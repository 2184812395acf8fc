use chrono::NaiveDate;

/// Long en-US form, e.g. "Tuesday, June 3, 2042".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form_without_day_padding() {
        let d = NaiveDate::from_ymd_opt(2042, 6, 3).unwrap();
        assert_eq!(format_long_date(d), "Tuesday, June 3, 2042");
    }

    #[test]
    fn two_digit_day() {
        let d = NaiveDate::from_ymd_opt(2018, 3, 10).unwrap();
        assert_eq!(format_long_date(d), "Saturday, March 10, 2018");
    }
}
