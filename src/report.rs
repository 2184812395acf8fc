//! Plain-text rendering of a calculation: an age card, a retirement card and
//! the insight panel, each as a dashed header followed by dotted key/value
//! rows aligned to a common width.

use crate::calculation::CalculationResult;
use crate::format::format_long_date;
use crate::insight::InsightData;

const MIN_ALIGN_WIDTH: usize = 44;

pub fn build_stat_row(key: &str, value: &str, align_width: usize) -> String {
    let key_part = format!("{key}: ");
    let base_len = key_part.chars().count() + value.chars().count();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => "".to_string(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => ".".repeat(n),
    };

    format!("{key_part}{dots}{value}")
}

fn build_header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.chars().count()) + 2;
    format!("{base}{}", "-".repeat(dash_count))
}

fn align_width(rows: &[(&str, String)]) -> usize {
    rows.iter()
        .map(|(k, v)| k.chars().count() + v.chars().count() + 4)
        .max()
        .unwrap_or(0)
        .max(MIN_ALIGN_WIDTH)
}

fn render_card(title: &str, rows: &[(&str, String)]) -> String {
    let width = align_width(rows);
    let mut out = build_header_line(title, width);
    for (key, value) in rows {
        out.push('\n');
        out.push_str(&build_stat_row(key, value, width));
    }
    out
}

/// Age and retirement cards.
pub fn render_result(result: &CalculationResult, retirement_age: u32) -> String {
    let age = &result.age;
    let retirement = &result.retirement;

    let age_card = render_card(
        "Current Age",
        &[
            ("Age", format!("{} Years", age.years)),
            ("Plus", format!("{} Months, {} Days", age.months, age.days)),
            ("Note", "You are in your prime!".to_string()),
        ],
    );

    let retirement_card = if retirement.is_retired {
        render_card(
            "Retired Since",
            &[
                ("Date", format_long_date(retirement.retirement_date)),
                ("Status", "Enjoy your freedom!".to_string()),
                ("Note", "Service Completed".to_string()),
            ],
        )
    } else {
        render_card(
            "Retirement Date",
            &[
                ("Date", format_long_date(retirement.retirement_date)),
                (
                    "Left",
                    format!(
                        "{} years, {} months, {} days",
                        retirement.years_left, retirement.months_left, retirement.days_left
                    ),
                ),
                ("Note", format!("Retiring at age {retirement_age}")),
            ],
        )
    };

    format!("{age_card}\n\n{retirement_card}")
}

pub fn render_insight(insight: &InsightData, retirement_year: i32) -> String {
    let title = format!("Vision for {retirement_year}");
    let width = MIN_ALIGN_WIDTH.max(title.chars().count() + 2);
    format!(
        "{}\n\"{}\"\n* {}",
        build_header_line(&title, width),
        insight.prediction,
        insight.motivation
    )
}
