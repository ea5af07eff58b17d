//! Regex-based detection of bare links and phone numbers

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).expect("link pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[ .-]?)?(?:\(\d{1,4}\)[ .-]?)?\d{2,4}(?:[ .-]?\d{2,5}){1,4}")
        .expect("phone pattern is valid")
});

/// Minimum and maximum digit counts for something to read as a phone number
const PHONE_DIGITS: Range<usize> = 7..16;

/// Trailing characters that end a sentence rather than a URL
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// A detected range together with the value a tap should report
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub range: Range<usize>,
    /// Absolute URL for links, the matched text for phone numbers
    pub value: String,
}

/// Find bare URLs in `text`
///
/// `www.` links get an `http://` scheme in their reported value.
pub fn detect_links(text: &str) -> Vec<Detection> {
    LINK_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let matched = m.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION);
            if matched.is_empty() {
                return None;
            }
            let range = m.start()..m.start() + matched.len();
            let bare = matched
                .get(..4)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."));
            let value = if bare {
                format!("http://{matched}")
            } else {
                matched.to_string()
            };
            // Punctuation trimming can leave a bare scheme or a truncated "www"
            if value.ends_with("://") || !value.contains("://") {
                return None;
            }
            Some(Detection { range, value })
        })
        .collect()
}

/// True for calendar dates (`15.01.2020`, `2020-01-15`, `01/15/2020`) and
/// year ranges (`2020-2021`)
fn looks_like_date(candidate: &str) -> bool {
    if candidate.starts_with(['+', '(']) {
        return false;
    }
    let groups: Vec<&str> = candidate.split([' ', '.', '-', '/']).collect();
    let Some(separator) = candidate.chars().find(|c| !c.is_ascii_digit()) else {
        return false;
    };
    if groups.iter().any(|g| g.is_empty() || !g.bytes().all(|b| b.is_ascii_digit()))
        || candidate.chars().any(|c| !c.is_ascii_digit() && c != separator)
    {
        return false;
    }

    let number = |g: &str| g.parse::<u32>().unwrap_or(0);
    let day = |g: &str| g.len() <= 2 && (1..=31).contains(&number(g));
    let month = |g: &str| g.len() <= 2 && (1..=12).contains(&number(g));
    let year = |g: &str| g.len() == 4;

    match groups.as_slice() {
        [a, b] => year(a) && year(b),
        [y, m, d] if year(y) => month(m) && day(d),
        [a, b, y] if year(y) || y.len() == 2 => {
            (day(a) && month(b)) || (month(a) && day(b))
        }
        _ => false,
    }
}

/// Find phone numbers in `text`
///
/// Matches must contain 7 to 15 digits, must not be glued to letters or
/// other digits, and must not read as a date or a year range.
pub fn detect_phone_numbers(text: &str) -> Vec<Detection> {
    PHONE_PATTERN
        .find_iter(text)
        .filter(|m| {
            let digits = m.as_str().chars().filter(char::is_ascii_digit).count();
            PHONE_DIGITS.contains(&digits)
        })
        .filter(|m| !looks_like_date(m.as_str()))
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .map(|m| Detection {
            range: m.range(),
            value: m.as_str().to_string(),
        })
        .collect()
}

/// True if `range` intersects any of `taken`
pub(crate) fn overlaps(range: &Range<usize>, taken: &[Range<usize>]) -> bool {
    taken
        .iter()
        .any(|t| range.start < t.end && t.start < range.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_links() {
        let text = "See https://www.bahn.de/p/view. Or www.example.com, thanks";
        let found = detect_links(text);
        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[0].range.clone()], "https://www.bahn.de/p/view");
        assert_eq!(found[0].value, "https://www.bahn.de/p/view");
        assert_eq!(&text[found[1].range.clone()], "www.example.com");
        assert_eq!(found[1].value, "http://www.example.com");
    }

    #[test]
    fn test_detect_phone_numbers() {
        let text = "Call 555-1234 or +49 30 1234567, not 2020 or ab5551234";
        let found: Vec<_> = detect_phone_numbers(text)
            .into_iter()
            .map(|d| d.value)
            .collect();
        assert_eq!(found, vec!["555-1234", "+49 30 1234567"]);
    }

    #[test]
    fn test_dates_are_not_phone_numbers() {
        for text in [
            "Abfahrt am 15.01.2020 um 10 Uhr",
            "Fahrplan 2020-2021 gilt",
            "Stand: 2020-01-15",
            "due 01/15/2020",
        ] {
            assert_eq!(detect_phone_numbers(text), Vec::<Detection>::new(), "{text}");
        }
    }

    #[test]
    fn test_date_filter_keeps_phone_shapes() {
        assert!(!looks_like_date("555-1234"));
        assert!(!looks_like_date("+49 30 1234567"));
        assert!(!looks_like_date("030 1234 5678"));
        assert!(!looks_like_date("12.34.5678"));
        assert!(looks_like_date("2020.12.31"));
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps(&(2..5), &[4..8]));
        assert!(!overlaps(&(2..4), &[4..8]));
        assert!(!overlaps(&(2..4), &[]));
    }
}
