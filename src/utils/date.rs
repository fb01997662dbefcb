//! Date normalisation into calendar-literal `(year, month, day)` parts.
//!
//! Dates are resolved in a fixed order: ISO numeric forms first, then
//! the textual-month layouts a source is known to use, then a bare four-digit
//! year anywhere in the input. No timezone handling is done.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lowercase three-letter month tokens, January first
pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Normalised date; absent components are empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: String,
    pub month: String,
    pub day: String,
}

impl DateParts {
    /// Whether no component was recovered
    pub fn is_empty(&self) -> bool {
        self.year.is_empty() && self.month.is_empty() && self.day.is_empty()
    }
}

/// Layouts of dates written with a month name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextualDate {
    /// `14 Mar 2024`, `14 March, 2024`
    DayMonthYear,
    /// `March 14, 2024`, `Mar 2024`
    MonthDayYear,
    /// `2024 Mar 14`, `2024 Mar`
    YearMonthDay,
}

impl TextualDate {
    /// Every layout, in the order the generic normaliser tries them
    pub const ALL: [TextualDate; 3] = [
        TextualDate::DayMonthYear,
        TextualDate::MonthDayYear,
        TextualDate::YearMonthDay,
    ];

    fn regex(&self) -> &'static Regex {
        static DMY: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]{3,9})\.?,?\s+(\d{4})\b").unwrap()
        });
        static MDY: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\b([a-z]{3,9})\.?\s+(?:(\d{1,2})(?:st|nd|rd|th)?,?\s+)?(\d{4})\b")
                .unwrap()
        });
        static YMD: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)\b(\d{4})\s+([a-z]{3,9})\.?(?:\s+(\d{1,2}))?\b").unwrap()
        });
        match self {
            TextualDate::DayMonthYear => &DMY,
            TextualDate::MonthDayYear => &MDY,
            TextualDate::YearMonthDay => &YMD,
        }
    }

    fn parse(&self, input: &str) -> Option<DateParts> {
        for caps in self.regex().captures_iter(input) {
            let (year, month, day) = match self {
                TextualDate::DayMonthYear => (caps.get(3), caps.get(2), caps.get(1)),
                TextualDate::MonthDayYear => (caps.get(3), caps.get(1), caps.get(2)),
                TextualDate::YearMonthDay => (caps.get(1), caps.get(2), caps.get(3)),
            };
            let Some(month) = month.and_then(|m| month_from_name(m.as_str())) else {
                continue;
            };
            let Some(year) = year else { continue };
            return Some(DateParts {
                year: year.as_str().to_string(),
                month: month.to_string(),
                day: day.and_then(|d| day_token(d.as_str())).unwrap_or_default(),
            });
        }
        None
    }
}

/// Normalise a date trying every textual layout
pub fn normalize_date(input: &str) -> DateParts {
    normalize_date_with(input, &TextualDate::ALL)
}

/// Normalise a date: ISO numeric, then the given textual layouts in order,
/// then a bare year.
pub fn normalize_date_with(input: &str, textual: &[TextualDate]) -> DateParts {
    let input = input.trim();
    if input.is_empty() {
        return DateParts::default();
    }
    if let Some(parts) = parse_iso(input) {
        return parts;
    }
    if let Some(parts) = textual.iter().find_map(|t| t.parse(input)) {
        return parts;
    }
    parse_year(input)
        .map(|year| DateParts {
            year,
            ..Default::default()
        })
        .unwrap_or_default()
}

/// Month token for a 1-based month number
pub fn month_token(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Month token for an English month name or abbreviation
pub fn month_from_name(name: &str) -> Option<&'static str> {
    let lower = name.trim().trim_end_matches('.').to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    if lower == "sept" {
        return Some("sep");
    }
    MONTHS.iter().copied().find(|m| {
        lower.starts_with(m) && full_month_name(m).starts_with(lower.as_str())
    })
}

fn full_month_name(token: &str) -> &'static str {
    match token {
        "jan" => "january",
        "feb" => "february",
        "mar" => "march",
        "apr" => "april",
        "may" => "may",
        "jun" => "june",
        "jul" => "july",
        "aug" => "august",
        "sep" => "september",
        "oct" => "october",
        "nov" => "november",
        _ => "december",
    }
}

fn parse_iso(input: &str) -> Option<DateParts> {
    // Unanchored so "Published: 2024-03-15" keeps its month and day.
    static ISO: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:^|\D)(\d{4})[-/](\d{1,2})(?:[-/](\d{1,2}))?(?:\D|$)").unwrap()
    });
    let caps = ISO.captures(input)?;
    let year = caps.get(1)?.as_str().to_string();
    let month = month_token(caps.get(2)?.as_str().parse().ok()?)?;
    let day = match caps.get(3) {
        Some(d) => day_token(d.as_str())?,
        None => String::new(),
    };
    Some(DateParts {
        year,
        month: month.to_string(),
        day,
    })
}

fn parse_year(input: &str) -> Option<String> {
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
    YEAR.captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn day_token(day: &str) -> Option<String> {
    let day: u32 = day.parse().ok()?;
    (1..=31).contains(&day).then(|| day.to_string())
}
