//! Fixed answers that need no external service: clock, calendar, and
//! "open <site>" shortcuts.

use chrono::NaiveDateTime;
use serde::Serialize;

use ruby_text_processing::to_nfc_lower;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickAnswer {
    pub reply: String,
    /// Page the client should open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<&'static str>,
}

const SITES: &[(&str, &str, &str)] = &[
    ("mở youtube", "Đã mở YouTube giúp bạn.", "https://www.youtube.com"),
    ("mở google", "Mở Google nè.", "https://www.google.com"),
    ("mở facebook", "Đây là Facebook!", "https://www.facebook.com"),
];

/// Answer for `message` at local time `now`, if it is one of the fixed questions
pub fn quick_answer_at(message: &str, now: NaiveDateTime) -> Option<QuickAnswer> {
    let text = to_nfc_lower(message);

    if text.contains("mấy giờ") {
        return Some(QuickAnswer {
            reply: format!("Bây giờ là {}", now.format("%H:%M:%S")),
            open_url: None,
        });
    }

    if text.contains("ngày mấy") {
        return Some(QuickAnswer {
            reply: format!("Hôm nay là ngày {}", now.format("%d/%m/%Y")),
            open_url: None,
        });
    }

    SITES
        .iter()
        .find(|(phrase, _, _)| text.contains(phrase))
        .map(|&(_, reply, url)| QuickAnswer {
            reply: reply.to_string(),
            open_url: Some(url),
        })
}
