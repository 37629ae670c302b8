//! Slugs for nodes created from a title rather than a filename.

use unicode_normalization::UnicodeNormalization;

/// Convert a human title into an identifier.
///
/// Accented letters are folded to ASCII, a few Latin letters without a
/// decomposition are transliterated (`ß` to `ss`, `æ` to `ae`, ...), and
/// anything else outside printable ASCII is dropped. The result is lowercase; runs of `-`, `_` and
/// whitespace become a single `_`; other punctuation is removed without
/// leaving a separator. Leading and trailing separators are trimmed.
///
/// # Examples
///
/// ```
/// use folio_tree::slug;
///
/// assert_eq!(slug("Getting Started"), "getting_started");
/// assert_eq!(slug("Crème brûlée - v2.0!"), "creme_brulee_v20");
/// assert_eq!(slug("Straße"), "strasse");
/// ```
#[must_use]
pub fn slug(title: &str) -> String {
    let mut folded = String::with_capacity(title.len());
    for c in title.nfkd() {
        match transliterate(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }

    let mut result = String::with_capacity(folded.len());
    let mut pending_separator = false;

    for c in folded.chars().filter(|c| (' '..='~').contains(c)) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !result.is_empty() {
                result.push('_');
            }
            pending_separator = false;
            result.push(c.to_ascii_lowercase());
        } else if c == '-' || c == '_' || c == ' ' {
            pending_separator = true;
        }
    }

    result
}

/// ASCII spelling of letters that NFKD leaves untouched.
fn transliterate(c: char) -> Option<&'static str> {
    let ascii = match c {
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ø' => "o",
        'Ø' => "O",
        'đ' | 'ð' => "d",
        'Đ' | 'Ð' => "D",
        'ł' => "l",
        'Ł' => "L",
        'þ' => "th",
        'Þ' => "TH",
        _ => return None,
    };
    Some(ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_basic() {
        assert_eq!(slug("Hello World"), "hello_world");
        assert_eq!(slug("index"), "index");
    }

    #[test]
    fn test_slug_collapses_separators() {
        assert_eq!(slug("a  -  b__c"), "a_b_c");
        assert_eq!(slug("--Leading and trailing--"), "leading_and_trailing");
    }

    #[test]
    fn test_slug_drops_punctuation_without_separator() {
        assert_eq!(slug("What's new?"), "whats_new");
        assert_eq!(slug("v1.2"), "v12");
    }

    #[test]
    fn test_slug_folds_accents() {
        assert_eq!(slug("Über Café"), "uber_cafe");
    }

    #[test]
    fn test_slug_transliterates_undecomposable_letters() {
        assert_eq!(slug("Straße"), "strasse");
        assert_eq!(slug("Æsir Œuvre"), "aesir_oeuvre");
        assert_eq!(slug("Øresund Łódź"), "oresund_lodz");
    }

    #[test]
    fn test_slug_drops_non_latin() {
        assert_eq!(slug("日本 docs"), "docs");
        assert_eq!(slug("日本"), "");
    }

    #[test]
    fn test_slug_drops_control_characters() {
        assert_eq!(slug("tab\there"), "tabhere");
    }
}
