//! Vietnamese Accent Folding
//!
//! Shared helpers for diacritic-insensitive comparison. Used by the city
//! resolver (folded keys) and by the date/reminder parsers (NFC + lowercase
//! so decomposed speech-engine output matches precomposed vocabularies).
//!
//! Folded text is a comparison key only and is never shown to the user.

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block. Vietnamese tone and vowel marks
/// (grave, acute, tilde, hook above, dot below, circumflex, breve, horn)
/// all decompose into this range.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Strip Vietnamese diacritics, keeping case, spacing and everything else.
///
/// `đ`/`Đ` have no canonical decomposition and are mapped to `d`/`D`
/// explicitly. Only Latin letters are decomposed, so non-Latin scripts pass
/// through untouched.
///
/// # Examples
/// ```
/// use ruby_text_processing::accents::strip_accents;
/// assert_eq!(strip_accents("Đà Nẵng"), "Da Nang");
/// assert_eq!(strip_accents("Thừa Thiên Huế, 22/6!"), "Thua Thien Hue, 22/6!");
/// ```
pub fn strip_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            c if c.is_ascii() => out.push(c),
            c if COMBINING_MARKS.contains(&c) => {}
            c if is_latin_letter(c) => {
                out.extend(c.nfd().filter(|m| !COMBINING_MARKS.contains(m)));
            }
            c => out.push(c),
        }
    }
    out
}

/// Lowercase and compose to NFC.
pub fn to_nfc_lower(text: &str) -> String {
    text.to_lowercase().nfc().collect()
}

/// Comparison key: lowercase, NFC, accent-stripped.
pub fn fold_for_match(text: &str) -> String {
    strip_accents(&to_nfc_lower(text))
}

/// Latin-1 Supplement through Latin Extended-B, plus Latin Extended Additional
/// (where most precomposed Vietnamese vowels live).
fn is_latin_letter(c: char) -> bool {
    matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}') && c.is_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_basic() {
        assert_eq!(strip_accents("Hà Nội"), "Ha Noi");
        assert_eq!(strip_accents("sài gòn"), "sai gon");
        assert_eq!(strip_accents("Bà Rịa - Vũng Tàu"), "Ba Ria - Vung Tau");
        assert_eq!(strip_accents("Quảng Ngãi"), "Quang Ngai");
    }

    #[test]
    fn test_strip_d_stroke() {
        assert_eq!(strip_accents("đắk lắk"), "dak lak");
        assert_eq!(strip_accents("ĐIỆN BIÊN"), "DIEN BIEN");
    }

    #[test]
    fn test_preserves_case_spacing_and_symbols() {
        assert_eq!(strip_accents("  Thời tiết: 30°C?  "), "  Thoi tiet: 30°C?  ");
        assert_eq!(strip_accents("TP Hồ Chí Minh"), "TP Ho Chi Minh");
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["Thừa Thiên Huế", "nhắc tôi gọi mẹ", "plain ascii", "Đồng Tháp"];
        for input in inputs {
            let once = strip_accents(input);
            assert_eq!(strip_accents(&once), once);
        }
    }

    #[test]
    fn test_decomposed_input() {
        // "ố" written as o + circumflex + acute
        let decomposed = "Ho\u{0302}\u{0301} Chi\u{0301} Minh";
        assert_eq!(strip_accents(decomposed), "Ho Chi Minh");
    }

    #[test]
    fn test_non_latin_untouched() {
        assert_eq!(strip_accents("東京 서울"), "東京 서울");
    }

    #[test]
    fn test_fold_for_match() {
        assert_eq!(fold_for_match("Thời Tiết SÀI GÒN"), "thoi tiet sai gon");
    }

    #[test]
    fn test_nfc_lower_composes() {
        let decomposed = "Tha\u{0306}\u{0300}m"; // "Thằm" decomposed
        assert_eq!(to_nfc_lower(decomposed), "thằm");
    }
}
