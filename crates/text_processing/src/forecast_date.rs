//! Forecast Date Extraction
//!
//! Picks the calendar day a weather question is about. Rules run in a fixed
//! order against the lowercased, NFC-composed message:
//!
//! 1. `DD/MM` or `DD-MM` (this year, or next year if already past)
//! 2. "ngày mai" / "mai" → tomorrow
//! 3. "ngày mốt" / "mốt" / "ngày kia" → the day after
//! 4. present-tense words ("hôm nay", "bây giờ", "ra sao", ...) → today
//! 5. weekday names → next occurrence, never today
//!
//! `None` means "no particular day": callers ask for current conditions.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ruby_text_processing::forecast_date::{extract_forecast_date_at, format_iso};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
//! let date = extract_forecast_date_at("thời tiết ngày mai", today).unwrap();
//! assert_eq!(format_iso(date), "2025-06-11");
//! ```

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::accents::to_nfc_lower;

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})[/-]([0-9]{1,2})").unwrap());

const TOMORROW: &[&str] = &["ngày mai", "mai"];

const DAY_AFTER_TOMORROW: &[&str] = &["ngày mốt", "mốt", "ngày kia"];

const PRESENT: &[&str] = &[
    "hôm nay",
    "bây giờ",
    "hiện tại",
    "hiện giờ",
    "lúc này",
    "ra sao",
    "thế nào",
    "có nắng",
    "có mưa",
];

/// First label found wins, so each word form precedes its numeric form.
const WEEKDAYS: &[(&str, Weekday)] = &[
    ("thứ hai", Weekday::Mon),
    ("thứ 2", Weekday::Mon),
    ("thứ ba", Weekday::Tue),
    ("thứ 3", Weekday::Tue),
    ("thứ tư", Weekday::Wed),
    ("thứ 4", Weekday::Wed),
    ("thứ năm", Weekday::Thu),
    ("thứ 5", Weekday::Thu),
    ("thứ sáu", Weekday::Fri),
    ("thứ 6", Weekday::Fri),
    ("thứ bảy", Weekday::Sat),
    ("thứ 7", Weekday::Sat),
    ("chủ nhật", Weekday::Sun),
];

/// Extract the forecast date using today's local date
pub fn extract_forecast_date(message: &str) -> Option<NaiveDate> {
    extract_forecast_date_at(message, Local::now().date_naive())
}

/// Extract the forecast date relative to `today`
pub fn extract_forecast_date_at(message: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = to_nfc_lower(message);

    if let Some(date) = numeric_date(&text, today) {
        tracing::debug!(%date, "Forecast date from day/month");
        return Some(date);
    }

    if contains_any(&text, TOMORROW) {
        tracing::debug!("Forecast date: tomorrow");
        return Some(today + Duration::days(1));
    }

    if contains_any(&text, DAY_AFTER_TOMORROW) {
        tracing::debug!("Forecast date: day after tomorrow");
        return Some(today + Duration::days(2));
    }

    if contains_any(&text, PRESENT) {
        tracing::debug!("Forecast date: today");
        return Some(today);
    }

    if let Some(&(label, weekday)) = WEEKDAYS.iter().find(|(label, _)| text.contains(label)) {
        let date = next_weekday(today, weekday);
        tracing::debug!(label, %date, "Forecast date from weekday");
        return Some(date);
    }

    None
}

/// `YYYY-MM-DD`
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Day/month in the current year, rolled to next year when already past.
/// Impossible dates give `None` so the keyword rules still get a turn.
fn numeric_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(text)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;

    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        return Some(this_year);
    }
    NaiveDate::from_ymd_opt(today.year() + 1, month, day)
}

/// Strictly after `today`: the same weekday is a week away.
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut days_ahead = (wanted - current).rem_euclid(7);
    if days_ahead == 0 {
        days_ahead = 7;
    }
    today + Duration::days(days_ahead)
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
