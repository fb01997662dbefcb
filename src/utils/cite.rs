//! Citation key synthesis.
//!
//! Keys have the form `<surname><year><titleword>` with no separators. The
//! surname and title word are lowercase ASCII letters; the year is four digits
//! or `XXXX`. Keys are not unique.

use crate::models::{Field, MergedRecord};

/// Used when no author surname can be recovered
pub const UNKNOWN_AUTHOR: &str = "unknown";
/// Used when the record carries no four-digit year
pub const UNKNOWN_YEAR: &str = "XXXX";
/// Used when the title yields no significant word
pub const UNTITLED: &str = "untitled";

const TITLE_WORD_MAX: usize = 10;

/// Words never picked as the title word
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "so", "yet", "of", "in", "on", "at", "to",
    "for", "with", "by", "from", "into", "onto", "upon", "about", "above", "after", "against",
    "among", "around", "before", "behind", "below", "between", "beyond", "during", "over",
    "through", "toward", "towards", "under", "within", "without", "via", "this", "that",
    "these", "those", "there", "their", "them", "they", "what", "when", "where", "which",
    "while", "who", "whom", "whose", "why", "how", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "does", "did", "doing", "will", "would", "shall", "should",
    "can", "could", "may", "might", "must", "your", "yours", "our", "ours", "its", "some",
    "such", "than", "then", "very", "more", "most", "also", "just", "only", "using",
];

/// Build a citation key from the first author, the year and the title
pub fn cite_key(record: &MergedRecord) -> String {
    cite_key_from_parts(
        record.get(Field::Authors),
        record.get(Field::Year),
        record.get(Field::Title),
    )
}

/// Build a citation key from raw parts
pub fn cite_key_from_parts(authors: Option<&str>, year: Option<&str>, title: Option<&str>) -> String {
    format!(
        "{}{}{}",
        surname_token(authors.unwrap_or_default()),
        year_token(year.unwrap_or_default()),
        title_token(title.unwrap_or_default()),
    )
}

/// Lowercased surname of the first author
///
/// Authors split on ` and ` or `;`. The surname is the text before a comma,
/// or else the last whitespace-delimited token.
pub fn surname_token(authors: &str) -> String {
    let first = authors
        .split(" and ")
        .flat_map(|a| a.split(';'))
        .map(str::trim)
        .find(|a| !a.is_empty())
        .unwrap_or_default();

    let surname = match first.split_once(',') {
        Some((last, _)) => last.trim(),
        None => first.split_whitespace().last().unwrap_or_default(),
    };

    let cleaned = letters_only(surname);
    if cleaned.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        cleaned
    }
}

/// The year if it is exactly four digits, `XXXX` otherwise
pub fn year_token(year: &str) -> String {
    let year = year.trim();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        year.to_string()
    } else {
        UNKNOWN_YEAR.to_string()
    }
}

/// First title word longer than three letters that is not a stop word,
/// truncated to ten characters
pub fn title_token(title: &str) -> String {
    title
        .split_whitespace()
        .map(letters_only)
        .find(|w| w.len() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .map(|w| w.chars().take(TITLE_WORD_MAX).collect())
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn letters_only(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cite_key_example() {
        let key = cite_key_from_parts(
            Some("Jane Doe and John Smith"),
            Some("2023"),
            Some("Understanding Deep Learning Systems"),
        );
        assert_eq!(key, "doe2023understand");
    }

    #[test]
    fn test_surname_forms() {
        assert_eq!(surname_token("Doe, Jane and Smith, John"), "doe");
        assert_eq!(surname_token("Jane van der Berg; Max Mustermann"), "berg");
        assert_eq!(surname_token("O'Neil, Cathy"), "oneil");
        assert_eq!(surname_token(""), "unknown");
        assert_eq!(surname_token("李雷"), "unknown");
    }

    #[test]
    fn test_year_token() {
        assert_eq!(year_token("2021"), "2021");
        assert_eq!(year_token("21"), "XXXX");
        assert_eq!(year_token(""), "XXXX");
    }

    #[test]
    fn test_title_token_skips_stop_words_and_short_words() {
        assert_eq!(title_token("On the Origin of Species"), "origin");
        assert_eq!(title_token("What Is This? Another Study"), "another");
        assert_eq!(title_token("A B C"), "untitled");
        assert_eq!(title_token("Self-Supervised Learning"), "selfsuperv");
    }

    #[test]
    fn test_missing_everything() {
        assert_eq!(cite_key_from_parts(None, None, None), "unknownXXXXuntitled");
    }
}
