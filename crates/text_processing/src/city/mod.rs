//! City Resolution
//!
//! Finds a Vietnamese province/city in free text and maps it to the ASCII
//! name the weather API accepts.
//!
//! Resolution order (first hit wins):
//! 1. Alias table, in table order
//! 2. Canonical city list, in list order
//! 3. (optional, via [`CityResolver::resolve_or_phrase`]) the text after
//!    "thời tiết/trời ... ở/tại", cleaned with [`clean_city`]
//!
//! All comparisons run on folded keys (lowercase, NFC, accent-stripped). Keys
//! for the tables are folded once when the resolver is built; the message is
//! folded once per call.
//!
//! Matching is plain substring containment, so short aliases can fire inside
//! unrelated words ("hn", "dn", "huế" inside "thuê"). That is a known limit of
//! the heuristic, not something callers should rely on either way.
//!
//! # Example
//!
//! ```
//! use ruby_text_processing::city::{resolve_city, latinize_city, DEFAULT_CITY};
//!
//! let city = resolve_city("mai đà lạt có mưa không").unwrap_or(DEFAULT_CITY);
//! assert_eq!(city, "Lâm Đồng");
//! assert_eq!(latinize_city(city), "Lam Dong");
//! ```

mod tables;

pub use tables::{CANONICAL_CITIES, CITY_ALIASES, LATIN_NAMES};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

use crate::accents::{fold_for_match, to_nfc_lower};
use crate::{Result, TextProcessingError};

/// City used when nothing in the message names one.
pub const DEFAULT_CITY: &str = "TP Hồ Chí Minh";

static DEFAULT_RESOLVER: Lazy<CityResolver> = Lazy::new(CityResolver::new);

static LATIN_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| LATIN_NAMES.iter().copied().collect());

static LEADING_HONORIFIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:thành phố|tỉnh)\s+").unwrap());

static TRAILING_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:như thế nào|thế nào|ra sao|hôm nay|hiện tại|bây giờ|ngày mai|ngày mốt).*$")
        .unwrap()
});

static WEATHER_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:thời tiết|trời)[^\n]*?\s(?:ở|tại)\s+(?P<city>[\p{L}\s\-]+)").unwrap()
});

/// Which lookup produced a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitySource {
    Alias,
    CanonicalList,
    Phrase,
}

/// City found in a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityMatch {
    /// Canonical name for table hits, cleaned free text for phrase hits
    pub name: String,
    pub source: CitySource,
}

impl CityMatch {
    /// ASCII name for the weather API
    pub fn latinized(&self) -> String {
        latinize_city(&self.name)
    }
}

#[derive(Debug, Clone)]
struct FoldedEntry {
    key: String,
    canonical: &'static str,
}

/// Alias + canonical-list resolver with precomputed folded keys
///
/// Built-in aliases come first; aliases added with [`CityResolver::with_aliases`]
/// are appended, so the built-in order keeps deciding ties.
#[derive(Debug, Clone)]
pub struct CityResolver {
    aliases: Vec<FoldedEntry>,
    cities: Vec<FoldedEntry>,
}

impl Default for CityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CityResolver {
    /// Resolver over the built-in tables
    pub fn new() -> Self {
        let aliases = CITY_ALIASES
            .iter()
            .map(|&(alias, canonical)| FoldedEntry {
                key: fold_for_match(alias),
                canonical,
            })
            .collect();

        let cities = CANONICAL_CITIES
            .iter()
            .map(|&name| FoldedEntry {
                key: fold_for_match(name),
                canonical: name,
            })
            .collect();

        Self { aliases, cities }
    }

    /// Append aliases from configuration (builder pattern)
    ///
    /// Each target must name a canonical city (accent/case-insensitive);
    /// empty aliases are rejected because they would match every message.
    pub fn with_aliases<I, A, C>(mut self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: AsRef<str>,
    {
        for (alias, target) in extra {
            let alias = alias.as_ref().trim();
            let target = target.as_ref();

            if alias.is_empty() {
                return Err(TextProcessingError::EmptyAlias(target.to_string()));
            }

            let canonical =
                canonical_city(target).ok_or_else(|| TextProcessingError::UnknownAliasTarget {
                    alias: alias.to_string(),
                    target: target.to_string(),
                })?;

            self.aliases.push(FoldedEntry {
                key: fold_for_match(alias),
                canonical,
            });
        }

        tracing::debug!(aliases = self.aliases.len(), "City resolver aliases loaded");
        Ok(self)
    }

    /// Number of aliases (built-in + configured)
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Canonical city named in the message, if any
    pub fn resolve(&self, message: &str) -> Option<&'static str> {
        self.resolve_with_source(&fold_for_match(message))
            .map(|(name, _)| name)
    }

    /// Table lookup first, then the "thời tiết ở X" phrase
    pub fn resolve_or_phrase(&self, message: &str) -> Option<CityMatch> {
        if let Some((name, source)) = self.resolve_with_source(&fold_for_match(message)) {
            return Some(CityMatch {
                name: name.to_string(),
                source,
            });
        }

        extract_city_phrase(message).map(|name| {
            tracing::debug!(city = %name, "City taken from weather phrase");
            CityMatch {
                name,
                source: CitySource::Phrase,
            }
        })
    }

    fn resolve_with_source(&self, folded: &str) -> Option<(&'static str, CitySource)> {
        if let Some(entry) = self.aliases.iter().find(|e| folded.contains(&e.key)) {
            tracing::debug!(alias = %entry.key, city = entry.canonical, "City matched by alias");
            return Some((entry.canonical, CitySource::Alias));
        }

        if let Some(entry) = self.cities.iter().find(|e| folded.contains(&e.key)) {
            tracing::debug!(city = entry.canonical, "City matched by canonical name");
            return Some((entry.canonical, CitySource::CanonicalList));
        }

        None
    }
}

/// Resolve against the built-in tables
pub fn resolve_city(message: &str) -> Option<&'static str> {
    DEFAULT_RESOLVER.resolve(message)
}

/// Canonical spelling of a city name, compared accent/case-insensitively
pub fn canonical_city(name: &str) -> Option<&'static str> {
    let folded = fold_for_match(name.trim());
    CANONICAL_CITIES
        .iter()
        .copied()
        .find(|city| fold_for_match(city) == folded)
}

/// ASCII name for the weather API; unknown names come back unchanged
pub fn latinize_city(name: &str) -> String {
    match LATIN_MAP.get(name) {
        Some(latin) => (*latin).to_string(),
        None => {
            tracing::debug!(city = %name, "No latinized name, using original");
            name.to_string()
        }
    }
}

/// Tidy a free-text city fragment
///
/// Drops a leading "thành phố"/"tỉnh", cuts the first trailing question
/// phrase ("ra sao", "thế nào", ...) and everything after it, then title-cases.
///
/// ```
/// use ruby_text_processing::city::clean_city;
/// assert_eq!(clean_city("thành phố paris hôm nay ra sao"), "Paris");
/// assert_eq!(clean_city("tỉnh bình dương"), "Bình Dương");
/// ```
pub fn clean_city(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    let without_prefix = LEADING_HONORIFIC.replace(&composed, "");
    let without_suffix = TRAILING_QUESTION.replace(&without_prefix, "");
    title_case(without_suffix.trim())
}

/// City fragment following "thời tiết/trời ... ở/tại"
///
/// Heuristic fallback for names outside the tables; may return over-long
/// fragments.
pub fn extract_city_phrase(message: &str) -> Option<String> {
    let lowered = to_nfc_lower(message);
    let caps = WEATHER_PHRASE.captures(&lowered)?;
    let city = clean_city(caps.name("city")?.as_str());
    if city.is_empty() {
        None
    } else {
        Some(city)
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accents::strip_accents;

    #[test]
    fn test_every_canonical_resolves_to_itself() {
        for city in CANONICAL_CITIES {
            assert_eq!(resolve_city(&city.to_lowercase()), Some(city), "{}", city);
        }
    }

    #[test]
    fn test_every_alias_resolves_with_and_without_accents() {
        for (alias, canonical) in CITY_ALIASES {
            assert_eq!(resolve_city(alias), Some(*canonical), "alias {}", alias);
            assert_eq!(
                resolve_city(&strip_accents(alias)),
                Some(*canonical),
                "stripped alias {}",
                alias
            );
        }
    }

    #[test]
    fn test_latinize_is_total_over_canonical_list() {
        for city in CANONICAL_CITIES {
            assert!(LATIN_MAP.contains_key(city), "missing latin name for {}", city);
        }
        assert_eq!(latinize_city("Hà Nội"), "Hanoi");
        assert_eq!(latinize_city("TP Hồ Chí Minh"), "Ho Chi Minh");
    }

    #[test]
    fn test_latinize_unknown_passthrough() {
        assert_eq!(latinize_city("Paris"), "Paris");
        assert_eq!(latinize_city(""), "");
    }

    #[test]
    fn test_alias_targets_are_canonical() {
        for (_, canonical) in CITY_ALIASES {
            assert!(CANONICAL_CITIES.contains(canonical), "{}", canonical);
        }
    }

    #[test]
    fn test_resolve_saigon_question() {
        assert_eq!(
            resolve_city("thời tiết sài gòn hôm nay ra sao"),
            Some("TP Hồ Chí Minh")
        );
        assert_eq!(resolve_city("THỜI TIẾT SAI GON"), Some("TP Hồ Chí Minh"));
    }

    #[test]
    fn test_resolve_unaccented_message() {
        assert_eq!(resolve_city("thoi tiet da nang ngay mai"), Some("Đà Nẵng"));
        assert_eq!(resolve_city("troi o can tho co mua khong"), Some("Cần Thơ"));
    }

    #[test]
    fn test_alias_beats_canonical_list() {
        // "Quảng Ninh" is in the list, but the alias "hạ long" comes first
        assert_eq!(resolve_city("hạ long, quảng nam"), Some("Quảng Ninh"));
    }

    #[test]
    fn test_alias_table_order_breaks_ties() {
        // both "hà nội" and "sài gòn" present: sài gòn entries sit above hà nội
        assert_eq!(resolve_city("từ hà nội vào sài gòn"), Some("TP Hồ Chí Minh"));
    }

    #[test]
    fn test_no_city() {
        assert_eq!(resolve_city("thời tiết hôm nay thế nào"), None);
        assert_eq!(resolve_city(""), None);
    }

    #[test]
    fn test_vinh_does_not_shadow_vinh_provinces() {
        assert_eq!(resolve_city("vĩnh long"), Some("Vĩnh Long"));
        assert_eq!(resolve_city("trà vinh"), Some("Trà Vinh"));
        assert_eq!(resolve_city("thời tiết thành phố vinh"), Some("Nghệ An"));
    }

    #[test]
    fn test_short_alias_false_positive_is_known_limitation() {
        // "thuê" folds to "thue", which contains the alias "hue"
        assert_eq!(resolve_city("tôi muốn thuê xe"), Some("Huế"));
        // "dn" inside an unrelated token
        assert_eq!(resolve_city("cấu hình dns"), Some("Đà Nẵng"));
    }

    #[test]
    fn test_with_aliases_appends_and_validates() {
        let resolver = CityResolver::new()
            .with_aliases(vec![("bmt", "Đắk Lắk"), ("xứ thanh", "thanh hoa")])
            .unwrap();
        assert_eq!(resolver.alias_count(), CITY_ALIASES.len() + 2);
        assert_eq!(resolver.resolve("trời ở bmt"), Some("Đắk Lắk"));
        assert_eq!(resolver.resolve("xu thanh mua to"), Some("Thanh Hóa"));
    }

    #[test]
    fn test_with_aliases_rejects_unknown_target() {
        let err = CityResolver::new()
            .with_aliases(vec![("paris", "Paris")])
            .unwrap_err();
        assert!(matches!(err, TextProcessingError::UnknownAliasTarget { .. }));
    }

    #[test]
    fn test_with_aliases_rejects_empty_alias() {
        let err = CityResolver::new()
            .with_aliases(vec![("  ", "Hà Nội")])
            .unwrap_err();
        assert_eq!(err, TextProcessingError::EmptyAlias("Hà Nội".to_string()));
    }

    #[test]
    fn test_canonical_city_lookup() {
        assert_eq!(canonical_city("ha noi"), Some("Hà Nội"));
        assert_eq!(canonical_city("  TP HỒ CHÍ MINH "), Some("TP Hồ Chí Minh"));
        assert_eq!(canonical_city("sài gòn"), None);
    }

    #[test]
    fn test_clean_city() {
        assert_eq!(clean_city("thành phố hồ chí minh"), "Hồ Chí Minh");
        assert_eq!(clean_city("tỉnh lào cai hôm nay"), "Lào Cai");
        assert_eq!(clean_city("bangkok như thế nào"), "Bangkok");
        assert_eq!(clean_city("ra sao"), "");
    }

    #[test]
    fn test_title_case_after_hyphen() {
        assert_eq!(clean_city("bà rịa - vũng tàu"), "Bà Rịa - Vũng Tàu");
    }

    #[test]
    fn test_extract_city_phrase() {
        assert_eq!(
            extract_city_phrase("thời tiết ở paris hôm nay ra sao"),
            Some("Paris".to_string())
        );
        assert_eq!(
            extract_city_phrase("trời tại thành phố tokyo thế nào"),
            Some("Tokyo".to_string())
        );
        assert_eq!(extract_city_phrase("thời tiết hôm nay"), None);
        assert_eq!(extract_city_phrase("tôi đang ở nhà"), None);
    }

    #[test]
    fn test_resolve_or_phrase_prefers_tables() {
        let resolver = CityResolver::new();

        let hit = resolver.resolve_or_phrase("thời tiết ở đà lạt").unwrap();
        assert_eq!(hit.name, "Lâm Đồng");
        assert_eq!(hit.source, CitySource::Alias);

        let hit = resolver.resolve_or_phrase("thời tiết ở sơn la").unwrap();
        assert_eq!(hit.source, CitySource::CanonicalList);

        let hit = resolver.resolve_or_phrase("thời tiết ở seoul ra sao").unwrap();
        assert_eq!(hit.name, "Seoul");
        assert_eq!(hit.source, CitySource::Phrase);
        assert_eq!(hit.latinized(), "Seoul");

        assert!(resolver.resolve_or_phrase("mở youtube").is_none());
    }
}
