//! Integration tests for the extraction pipeline (message -> city/date/reminder)
//!
//! Each test feeds one utterance through the extractors the way the
//! dispatcher does and checks the combined result.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use ruby_text_processing::{
    extract_forecast_date_at, format_iso, latinize_city, match_device_command, parse_reminder_at,
    CityResolver, CitySource, DeviceCommand, ReminderPhrasing, DEFAULT_CITY,
};

fn today() -> NaiveDate {
    // Tuesday
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn now() -> NaiveDateTime {
    today().and_hms_opt(7, 30, 0).unwrap()
}

/// Weather question: city, forecast date and API name together
#[test]
fn test_weather_question_end_to_end() {
    let resolver = CityResolver::new();
    let message = "Thời tiết Đà Lạt ngày mai thế nào?";

    let city = resolver.resolve_or_phrase(message).unwrap();
    assert_eq!(city.name, "Lâm Đồng");
    assert_eq!(city.source, CitySource::Alias);
    assert_eq!(city.latinized(), "Lam Dong");

    let date = extract_forecast_date_at(message, today()).unwrap();
    assert_eq!(format_iso(date), "2025-06-11");
}

/// Unknown city falls back to the phrase path, then to the default
#[test]
fn test_city_fallback_chain() {
    let resolver = CityResolver::new();

    let phrase = resolver
        .resolve_or_phrase("thời tiết ở tokyo hôm nay ra sao")
        .unwrap();
    assert_eq!(phrase.name, "Tokyo");
    assert_eq!(phrase.source, CitySource::Phrase);
    assert_eq!(phrase.latinized(), "Tokyo");

    let none = resolver.resolve_or_phrase("hôm nay có mưa không");
    assert!(none.is_none());
    let city = none.map(|m| m.name).unwrap_or_else(|| DEFAULT_CITY.to_string());
    assert_eq!(latinize_city(&city), "Ho Chi Minh");
}

/// Unaccented typing resolves the same as accented
#[test]
fn test_unaccented_weather_question() {
    let resolver = CityResolver::new();
    let message = "du bao thoi tiet ha noi thu bay";

    assert_eq!(resolver.resolve(message), Some("Hà Nội"));
    // weekday words only match with diacritics
    assert_eq!(extract_forecast_date_at(message, today()), None);
    assert_eq!(
        extract_forecast_date_at("dự báo hà nội thứ bảy", today()),
        Some(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap())
    );
}

/// Configured aliases extend the built-in table
#[test]
fn test_configured_alias_flows_into_latin_name() {
    let resolver = CityResolver::new()
        .with_aliases([("cố đô", "Huế")])
        .unwrap();

    let city = resolver.resolve_or_phrase("trời ở cố đô có nắng không").unwrap();
    assert_eq!(city.name, "Huế");
    assert_eq!(city.latinized(), "Hue");
}

/// Reminder parsing for both relative orders plus an absolute form
#[test]
fn test_reminder_phrasings() {
    let r = parse_reminder_at("Nhắc tôi đổ rác trong 10 phút nữa", now()).unwrap();
    assert!(r.note.contains("đổ rác"));
    assert_eq!(r.remind_at, now() + Duration::minutes(10));

    let r = parse_reminder_at("sau 2 giờ, nhắc tôi gọi mẹ", now()).unwrap();
    assert!(r.note.contains("gọi mẹ"));
    assert_eq!(r.phrasing, ReminderPhrasing::DurationFirstWithTrigger);
    assert_eq!(r.remind_at, now() + Duration::hours(2));

    let r = parse_reminder_at("nhắc nhở họp nhóm vào 09:15 ngày 12/06/2025", now()).unwrap();
    assert_eq!(r.phrasing, ReminderPhrasing::ActionAt);
    assert_eq!(
        r.remind_at,
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap().and_hms_opt(9, 15, 0).unwrap()
    );
}

/// Messages for other intents are not mistaken for reminders
#[test]
fn test_non_reminders_fall_through() {
    for text in [
        "thời tiết sài gòn hôm nay ra sao",
        "bây giờ là mấy giờ",
        "bật đèn pin",
        "kể cho tôi một câu chuyện",
    ] {
        assert!(parse_reminder_at(text, now()).is_none(), "{}", text);
    }
}

/// Device phrases win before any other extractor is consulted
#[test]
fn test_device_command_detection() {
    assert_eq!(
        match_device_command("làm ơn tăng âm lượng"),
        Some(DeviceCommand::VolumeUp)
    );
    assert_eq!(match_device_command("nhắc tôi tắt bếp trong 5 phút"), None);
}
