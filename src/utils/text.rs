//! Text helpers shared by the extractors.

use once_cell::sync::Lazy;
use regex::Regex;

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a single-string author list into individual names.
///
/// `;` and ` and ` always separate names. Commas separate names only when
/// every comma-delimited part is itself a multi-word name, so an inverted
/// `Doe, Jane` stays one author.
pub fn split_author_list(s: &str) -> Vec<String> {
    let t = normalize_ws(s);
    if t.is_empty() {
        return Vec::new();
    }
    let parts: Vec<&str> = if t.contains(';') {
        t.split(';').collect()
    } else if t.contains(" and ") {
        t.split(" and ").collect()
    } else if t.contains(',') {
        let pieces: Vec<&str> = t.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        if pieces.len() > 1 && pieces.iter().all(|p| p.contains(' ')) {
            pieces
        } else {
            vec![t.as_str()]
        }
    } else {
        vec![t.as_str()]
    };
    parts
        .into_iter()
        .map(clean_author_name)
        .filter(|n| !n.is_empty())
        .collect()
}

/// Strip bylines and stray punctuation from one author name
pub fn clean_author_name(s: &str) -> String {
    static BYLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:written\s+)?by\s+").unwrap());
    let s = normalize_ws(s);
    let s = BYLINE.replace(&s, "");
    s.trim_matches(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .to_string()
}

/// Whether a value is a URL or a social handle rather than a person's name
pub fn looks_like_url_or_handle(s: &str) -> bool {
    let s = s.trim();
    s.starts_with('@') || s.starts_with("http://") || s.starts_with("https://") || s.contains("://")
}

/// Regex matching a DOI: `10.` + registrant code + `/` + suffix
pub static DOI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\b10\.\d{4,9}(?:\.\d+)*/[^\s"'<>]+"#).unwrap());

/// Find the first DOI in `s`, dropping trailing punctuation from the suffix.
///
/// A closing parenthesis is kept only when it balances an opening one inside
/// the DOI, e.g. `10.1016/S0140-6736(20)30183-5`.
pub fn find_doi(s: &str) -> Option<String> {
    let raw = DOI_RE.find(s)?.as_str();
    let doi = trim_doi_suffix(raw);
    doi.contains('/').then(|| doi.to_string())
}

fn trim_doi_suffix(mut doi: &str) -> &str {
    loop {
        let Some(last) = doi.chars().last() else {
            return doi;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | ']' | '}' | '"' | '\'' | '!' | '?' => true,
            ')' => doi.matches('(').count() < doi.matches(')').count(),
            _ => false,
        };
        if !strip {
            return doi;
        }
        doi = &doi[..doi.len() - last.len_utf8()];
    }
}

/// Remove a trailing `| Site Name` style suffix from a page title
pub fn strip_site_suffix(title: &str, site: &str) -> String {
    let site = site.trim();
    if site.is_empty() {
        return title.trim().to_string();
    }
    let pattern = format!(r"(?i)\s*[-–—|:~·•]\s*{}\s*$", regex::escape(site));
    match Regex::new(&pattern) {
        Ok(re) => {
            let stripped = re.replace(title, "").trim().to_string();
            if stripped.is_empty() {
                title.trim().to_string()
            } else {
                stripped
            }
        }
        Err(_) => title.trim().to_string(),
    }
}

/// Write a page range with a BibTeX double hyphen: `123-130` becomes `123--130`
pub fn page_range(s: &str) -> String {
    static RANGE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*([A-Za-z]?\d+)\s*(?:-+|–|—)\s*([A-Za-z]?\d+)\s*$").unwrap());
    match RANGE.captures(s) {
        Some(caps) => format!("{}--{}", &caps[1], &caps[2]),
        None => normalize_ws(s),
    }
}

/// Split a keyword list on `;` or `,`, dropping blanks and duplicates
pub fn split_keywords(s: &str) -> Vec<String> {
    let sep = if s.contains(';') { ';' } else { ',' };
    let mut out: Vec<String> = Vec::new();
    for part in s.split(sep) {
        let word = normalize_ws(part);
        if !word.is_empty() && !out.iter().any(|w| w.eq_ignore_ascii_case(&word)) {
            out.push(word);
        }
    }
    out
}
