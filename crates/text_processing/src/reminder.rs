//! Reminder Parsing
//!
//! Extracts an action and a target time from reminder requests such as
//! "nhắc tôi đổ rác trong 10 phút nữa" or "sau 2 giờ, nhắc tôi gọi mẹ".
//!
//! Phrasings are tried in order and the first structural match decides:
//!
//! | Phrasing | Shape |
//! |----------|-------|
//! | `ActionFirst` | trigger, action (shortest), `trong/sau N <unit> [nữa]` |
//! | `DurationFirstWithTrigger` | `trong/sau N <unit>`, `[,]`, trigger, action |
//! | `DurationFirstBare` | start of text, `[trigger]`, `trong/sau N <unit>`, `[,]`, `[trigger]`, action |
//! | `AtTime` | `lúc HH:MM ngày DD/MM/YYYY` (note = whole utterance) |
//! | `ActionAt` | `nhắc tôi <action> vào HH:MM [ngày] DD/MM/YYYY` |
//!
//! Once a phrasing matches, a bad unit word, an overflowing amount or an
//! impossible calendar date makes the whole parse return `None`.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use ruby_text_processing::reminder::parse_reminder_at;
//!
//! let now = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let reminder = parse_reminder_at("nhắc tôi đổ rác trong 10 phút nữa", now).unwrap();
//! assert_eq!(reminder.action, "đổ rác");
//! assert_eq!(reminder.note, "Nhắc nhở: đổ rác");
//! assert_eq!(reminder.remind_at, now + Duration::minutes(10));
//! ```

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::accents::to_nfc_lower;

/// Prefix of every reminder note
pub const REMINDER_LABEL: &str = "Nhắc nhở: ";

/// "nhắc tôi", "hãy nhắc nhở mình", "giúp tôi nhớ", ...
const TRIGGER: &str = r"(?:(?:hãy|làm ơn|xin)\s+)?(?:nhắc nhở|nhắc|giúp (?:tôi|mình|em) nhớ|nhớ giúp (?:tôi|mình|em))(?:\s+(?:tôi|mình|em))?";

/// "trong 10 phút nữa", "sau 2 tiếng", "trong vòng 3 ngày"
const DURATION: &str = r"(?:trong(?:\s+vòng)?|sau)\s+(?P<amount>[0-9]+)\s+(?P<unit>\p{L}+)\b(?:\s+nữa\b)?";

static ACTION_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{TRIGGER}\s+(?P<action>.+?)\s+{DURATION}")).unwrap()
});

static DURATION_FIRST_WITH_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{DURATION}\s*,?\s*{TRIGGER}\s+(?P<action>.+)")).unwrap()
});

static DURATION_FIRST_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:{TRIGGER}\s+)?{DURATION}\s*,?\s*(?:{TRIGGER}\s+)?(?P<action>.+)$"
    ))
    .unwrap()
});

static AT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"lúc\s+(?P<hour>[0-9]{1,2})[:h](?P<minute>[0-9]{2})\s+ngày\s+(?P<day>[0-9]{1,2})[/-](?P<month>[0-9]{1,2})[/-](?P<year>[0-9]{4})").unwrap()
});

static ACTION_AT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"nhắc\s+(?:tôi|nhở)\s+(?P<action>.+)\s+vào\s+(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2})\s*(?:ngày\s+)?(?P<day>[0-9]{1,2})[/-](?P<month>[0-9]{1,2})[/-](?P<year>[0-9]{4})").unwrap()
});

/// Words that can be left over when a trigger or duration is split badly.
/// An "action" made only of one of these is not an action.
const FILLER_ACTIONS: &[&str] = &["nữa", "tôi", "mình", "em"];

/// Second half of the `nhắc nhở` trigger. The trigger can backtrack to bare
/// `nhắc`, leaving this word at the front of the action.
const SPLIT_TRIGGER_TAIL: &str = "nhở";

/// Which sentence shape produced a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPhrasing {
    ActionFirst,
    DurationFirstWithTrigger,
    DurationFirstBare,
    AtTime,
    ActionAt,
}

impl ReminderPhrasing {
    /// Evaluation order
    pub const ALL: [ReminderPhrasing; 5] = [
        Self::ActionFirst,
        Self::DurationFirstWithTrigger,
        Self::DurationFirstBare,
        Self::AtTime,
        Self::ActionAt,
    ];

    /// Relative phrasings carry a duration; the others an absolute date/time
    pub fn is_relative(&self) -> bool {
        matches!(
            self,
            Self::ActionFirst | Self::DurationFirstWithTrigger | Self::DurationFirstBare
        )
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::ActionFirst => &ACTION_FIRST,
            Self::DurationFirstWithTrigger => &DURATION_FIRST_WITH_TRIGGER,
            Self::DurationFirstBare => &DURATION_FIRST_BARE,
            Self::AtTime => &AT_TIME,
            Self::ActionAt => &ACTION_AT,
        }
    }
}

/// Time unit of a relative reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl ReminderUnit {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "giây" => Some(Self::Second),
            "phút" => Some(Self::Minute),
            "giờ" | "tiếng" => Some(Self::Hour),
            "ngày" => Some(Self::Day),
            "tuần" => Some(Self::Week),
            _ => None,
        }
    }

    fn seconds(&self) -> i64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Week => 604_800,
        }
    }

    /// `amount` units as a duration; `None` on overflow
    pub fn offset(&self, amount: i64) -> Option<Duration> {
        Duration::try_seconds(amount.checked_mul(self.seconds())?)
    }
}

/// Reminder extracted from an utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReminder {
    /// Local wall-clock time to fire
    pub remind_at: NaiveDateTime,
    /// Action phrase as spoken (whole utterance for `AtTime`)
    pub action: String,
    /// `REMINDER_LABEL` + action, ready to store
    pub note: String,
    pub phrasing: ReminderPhrasing,
}

impl ParsedReminder {
    fn new(remind_at: NaiveDateTime, action: &str, phrasing: ReminderPhrasing) -> Self {
        Self {
            remind_at,
            action: action.to_string(),
            note: format!("{}{}", REMINDER_LABEL, action),
            phrasing,
        }
    }
}

/// Parse using the current local time
pub fn parse_reminder(text: &str) -> Option<ParsedReminder> {
    parse_reminder_at(text, Local::now().naive_local())
}

/// Parse relative to `now`
pub fn parse_reminder_at(text: &str, now: NaiveDateTime) -> Option<ParsedReminder> {
    let lowered = to_nfc_lower(text);
    let text = lowered.trim();

    for phrasing in ReminderPhrasing::ALL {
        let Some(caps) = phrasing.pattern().captures(text) else {
            continue;
        };

        if phrasing.is_relative() {
            let action = clean_action(caps.name("action")?.as_str());
            if is_leftover(action) {
                continue;
            }
            let parsed = relative(&caps, action, now, phrasing);
            if parsed.is_none() {
                tracing::debug!(?phrasing, "Reminder phrasing matched but time is invalid");
            }
            return parsed;
        }

        let action = match phrasing {
            ReminderPhrasing::ActionAt => clean_action(caps.name("action")?.as_str()),
            _ => text,
        };
        let parsed = absolute(&caps, action, phrasing);
        if parsed.is_none() {
            tracing::debug!(?phrasing, "Reminder phrasing matched but date is invalid");
        }
        return parsed;
    }

    None
}

fn relative(
    caps: &Captures<'_>,
    action: &str,
    now: NaiveDateTime,
    phrasing: ReminderPhrasing,
) -> Option<ParsedReminder> {
    let amount: i64 = caps.name("amount")?.as_str().parse().ok()?;
    let unit = ReminderUnit::from_word(caps.name("unit")?.as_str())?;
    let remind_at = now.checked_add_signed(unit.offset(amount)?)?;

    tracing::debug!(?phrasing, amount, ?unit, %remind_at, "Parsed relative reminder");
    Some(ParsedReminder::new(remind_at, action, phrasing))
}

fn absolute(caps: &Captures<'_>, action: &str, phrasing: ReminderPhrasing) -> Option<ParsedReminder> {
    let number = |name: &str| -> Option<u32> { caps.name(name)?.as_str().parse().ok() };

    let year: i32 = caps.name("year")?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number("month")?, number("day")?)?;
    let time = NaiveTime::from_hms_opt(number("hour")?, number("minute")?, 0)?;
    let remind_at = date.and_time(time);

    tracing::debug!(?phrasing, %remind_at, "Parsed absolute reminder");
    Some(ParsedReminder::new(remind_at, action, phrasing))
}

fn is_leftover(action: &str) -> bool {
    FILLER_ACTIONS.contains(&action)
        || action.split_whitespace().next() == Some(SPLIT_TRIGGER_TAIL)
}

fn clean_action(raw: &str) -> &str {
    raw.trim().trim_end_matches(['.', '!', '?']).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_action_first_minutes() {
        let r = parse_reminder_at("nhắc tôi đổ rác trong 10 phút nữa", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::ActionFirst);
        assert_eq!(r.action, "đổ rác");
        assert_eq!(r.note, "Nhắc nhở: đổ rác");
        assert_eq!(r.remind_at, now() + Duration::minutes(10));
    }

    #[test]
    fn test_action_first_shortest_action() {
        let r = parse_reminder_at("nhắc mình đi chợ sau 1 tiếng rồi nấu cơm trong 2 giờ", now())
            .unwrap();
        assert_eq!(r.action, "đi chợ");
        assert_eq!(r.remind_at, now() + Duration::hours(1));
    }

    #[test]
    fn test_duration_first_with_trigger() {
        let r = parse_reminder_at("sau 2 giờ, nhắc tôi gọi mẹ", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::DurationFirstWithTrigger);
        assert_eq!(r.action, "gọi mẹ");
        assert_eq!(r.remind_at, now() + Duration::hours(2));
    }

    #[test]
    fn test_duration_first_bare() {
        let r = parse_reminder_at("trong 30 giây nữa tắt bếp", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::DurationFirstBare);
        assert_eq!(r.action, "tắt bếp");
        assert_eq!(r.remind_at, now() + Duration::seconds(30));
    }

    #[test]
    fn test_trigger_before_duration_first() {
        let r = parse_reminder_at("nhắc tôi trong 10 phút nữa đổ rác", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::DurationFirstBare);
        assert_eq!(r.action, "đổ rác");
        assert_eq!(r.remind_at, now() + Duration::minutes(10));
    }

    #[test]
    fn test_nhac_nho_before_duration() {
        let r = parse_reminder_at("nhắc nhở trong 10 phút nữa đổ rác", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::DurationFirstBare);
        assert_eq!(r.action, "đổ rác");
        assert_eq!(r.note, "Nhắc nhở: đổ rác");
        assert_eq!(r.remind_at, now() + Duration::minutes(10));

        let r = parse_reminder_at("làm ơn nhắc nhở sau 2 tiếng uống thuốc", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::DurationFirstBare);
        assert_eq!(r.action, "uống thuốc");
        assert_eq!(r.remind_at, now() + Duration::hours(2));

        let r = parse_reminder_at("nhắc nhở đổ rác trong 10 phút nữa", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::ActionFirst);
        assert_eq!(r.action, "đổ rác");
    }

    #[test]
    fn test_trigger_variants() {
        let texts = [
            "hãy nhắc tôi uống thuốc trong 5 phút",
            "làm ơn nhắc nhở tôi uống thuốc trong 5 phút",
            "giúp tôi nhớ uống thuốc trong 5 phút nữa",
            "nhớ giúp mình uống thuốc sau 5 phút",
        ];
        for text in texts {
            let r = parse_reminder_at(text, now()).unwrap();
            assert_eq!(r.action, "uống thuốc", "{}", text);
            assert_eq!(r.remind_at, now() + Duration::minutes(5), "{}", text);
        }
    }

    #[test]
    fn test_all_units() {
        let cases = [
            ("nhắc tôi a trong 3 giây", Duration::seconds(3)),
            ("nhắc tôi a trong 3 phút", Duration::minutes(3)),
            ("nhắc tôi a trong 3 giờ", Duration::hours(3)),
            ("nhắc tôi a trong 3 tiếng", Duration::hours(3)),
            ("nhắc tôi a trong 3 ngày", Duration::days(3)),
            ("nhắc tôi a trong 3 tuần", Duration::weeks(3)),
        ];
        for (text, offset) in cases {
            let r = parse_reminder_at(text, now()).unwrap();
            assert_eq!(r.remind_at, now() + offset, "{}", text);
        }
    }

    #[test]
    fn test_unknown_unit_fails_whole_parse() {
        assert_eq!(parse_reminder_at("nhắc tôi học bài trong 2 tháng", now()), None);
    }

    #[test]
    fn test_overflowing_amount_fails() {
        assert_eq!(
            parse_reminder_at("nhắc tôi a trong 99999999999999999999 tuần", now()),
            None
        );
        assert_eq!(
            parse_reminder_at("nhắc tôi a trong 9000000000000000 tuần", now()),
            None
        );
    }

    #[test]
    fn test_nonsense_is_none() {
        assert_eq!(parse_reminder_at("xyz vô nghĩa không có thời gian", now()), None);
        assert_eq!(parse_reminder_at("nhắc tôi đổ rác", now()), None);
        assert_eq!(parse_reminder_at("", now()), None);
    }

    #[test]
    fn test_duration_alone_is_none() {
        assert_eq!(parse_reminder_at("sau 5 phút nữa", now()), None);
        assert_eq!(parse_reminder_at("trong 5 phút", now()), None);
    }

    #[test]
    fn test_bare_duration_must_lead() {
        // weather question with a duration in the middle is not a reminder
        assert_eq!(parse_reminder_at("thời tiết sau 2 ngày nữa ở đà lạt", now()), None);
    }

    #[test]
    fn test_uppercase_and_punctuation() {
        let r = parse_reminder_at("  Nhắc Tôi Gọi Điện Cho Sếp Trong 15 Phút Nữa!  ", now()).unwrap();
        assert_eq!(r.action, "gọi điện cho sếp");
        assert_eq!(r.remind_at, now() + Duration::minutes(15));
    }

    #[test]
    fn test_at_time_uses_whole_text() {
        let r = parse_reminder_at("tạo nhắc nhở vào lúc 10:40 ngày 6/6/2025", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::AtTime);
        assert_eq!(
            r.remind_at,
            NaiveDate::from_ymd_opt(2025, 6, 6).unwrap().and_hms_opt(10, 40, 0).unwrap()
        );
        assert_eq!(r.note, "Nhắc nhở: tạo nhắc nhở vào lúc 10:40 ngày 6/6/2025");
    }

    #[test]
    fn test_at_time_h_separator() {
        let r = parse_reminder_at("họp lúc 9h05 ngày 01-07-2025", now()).unwrap();
        assert_eq!(
            r.remind_at,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(9, 5, 0).unwrap()
        );
    }

    #[test]
    fn test_action_at() {
        let r = parse_reminder_at("nhắc tôi nộp báo cáo vào 14:30 ngày 20/6/2025", now()).unwrap();
        assert_eq!(r.phrasing, ReminderPhrasing::ActionAt);
        assert_eq!(r.action, "nộp báo cáo");
        assert_eq!(
            r.remind_at,
            NaiveDate::from_ymd_opt(2025, 6, 20).unwrap().and_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_absolute_date_is_none() {
        assert_eq!(parse_reminder_at("nhắc tôi họp vào 10:00 ngày 31/2/2025", now()), None);
        assert_eq!(parse_reminder_at("lúc 25:00 ngày 1/1/2025", now()), None);
        assert_eq!(parse_reminder_at("lúc 10:61 ngày 1/1/2025", now()), None);
    }

    #[test]
    fn test_unit_offsets() {
        assert_eq!(ReminderUnit::Week.offset(2), Some(Duration::days(14)));
        assert_eq!(ReminderUnit::Second.offset(i64::MAX), None);
        assert_eq!(ReminderUnit::from_word("tháng"), None);
    }

    #[test]
    fn test_parse_reminder_uses_wall_clock() {
        let before = Local::now().naive_local();
        let r = parse_reminder("nhắc tôi đổ rác trong 10 phút nữa").unwrap();
        let after = Local::now().naive_local();
        assert!(r.remind_at >= before + Duration::minutes(10));
        assert!(r.remind_at <= after + Duration::minutes(10));
    }
}
