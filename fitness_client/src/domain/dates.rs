use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalises a calendar date to `YYYY-MM-DD`.
///
/// Accepts plain dates (`2024-03-01`, `2024/03/01`, `03/01/2024`,
/// `March 1, 2024`) and timestamps, RFC 3339 included; a timestamp keeps the
/// date as written, whatever its offset. Returns `None` when nothing matches
/// or the day does not exist.
pub fn format_date(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    parse_date(input).map(|date| date.format("%Y-%m-%d").to_string())
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(input) {
        return Some(stamp.date_naive());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
                .map(|stamp| stamp.date())
        })
}
