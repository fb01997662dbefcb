//! Merge extractor outputs under a per-field priority table.
//!
//! Site-specific scrapers outrank generic meta conventions, which outrank
//! structured data, which outranks the coarse fallbacks. Fields without an
//! entry in [`FIELD_PRIORITY`] use [`DEFAULT_PRIORITY`].

use crate::extractors::{ExtractorId, ExtractorOutput};
use crate::models::{Field, MergedRecord, PartialRecord};

use ExtractorId::*;

/// Priority used for every field without an explicit entry, highest first
pub const DEFAULT_PRIORITY: &[ExtractorId] =
    &[Arxiv, PubMed, Scholar, Meta, JsonLd, Webpage, Publisher, Doi];

/// Field-specific priority lists, highest first. Extractors not listed for a
/// field are never consulted for it.
pub const FIELD_PRIORITY: &[(Field, &[ExtractorId])] = &[
    (Field::Title, &[Arxiv, PubMed, Scholar, Meta, JsonLd, Webpage]),
    (Field::Authors, &[Arxiv, PubMed, Scholar, Meta, JsonLd, Webpage]),
    (Field::Doi, &[Arxiv, PubMed, Scholar, Meta, JsonLd, Doi]),
    (Field::Volume, &[PubMed, Scholar, Meta, JsonLd, Publisher]),
    (Field::Issue, &[PubMed, Scholar, Meta, JsonLd, Publisher]),
    (Field::Pages, &[PubMed, Scholar, Meta, JsonLd, Publisher]),
    (Field::SiteName, &[Arxiv, PubMed, Meta, JsonLd, Webpage]),
    (Field::Organization, &[Meta, JsonLd, Webpage]),
    (Field::Url, &[Arxiv, PubMed, Scholar, Meta, JsonLd, Webpage]),
];

/// Fields that never enter the merged record; the classifier reads them
/// straight from the extractor outputs.
const CLASSIFIER_ONLY: &[Field] = &[Field::EntryType];

/// Priority list for one field
pub fn priority_for(field: Field) -> &'static [ExtractorId] {
    FIELD_PRIORITY
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, order)| *order)
        .unwrap_or(DEFAULT_PRIORITY)
}

/// Month and day travel with the year so a date is never stitched together
/// from two sources.
const DATE_PARTS: &[Field] = &[Field::Month, Field::Day];

/// Merge extractor outputs into one record.
///
/// For every field the outputs are consulted in that field's priority order
/// and the first non-blank value wins. Month and day come from whichever
/// output supplied the year, when any did. The result depends only on the
/// outputs, never on their order in `outputs`.
pub fn merge(outputs: &[ExtractorOutput]) -> MergedRecord {
    let year_source = pick(outputs, Field::Year).map(|(id, _)| id);
    let mut merged = PartialRecord::new();
    for field in Field::ALL {
        if CLASSIFIER_ONLY.contains(&field) {
            continue;
        }
        let winner = match year_source {
            Some(id) if DATE_PARTS.contains(&field) => value_from(outputs, id, field).map(|v| (id, v)),
            _ => pick(outputs, field),
        };
        if let Some((id, value)) = winner {
            tracing::trace!("{} taken from {}", field, id);
            merged.set(field, value);
        }
    }
    MergedRecord::from_partial(merged)
}

/// First non-blank value for `field` in its priority order
fn pick(outputs: &[ExtractorOutput], field: Field) -> Option<(ExtractorId, &str)> {
    priority_for(field)
        .iter()
        .find_map(|id| value_from(outputs, *id, field).map(|v| (*id, v)))
}

fn value_from(outputs: &[ExtractorOutput], id: ExtractorId, field: Field) -> Option<&str> {
    outputs
        .iter()
        .find(|o| o.id == id)
        .and_then(|o| o.record.get(field))
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::make_record;

    fn output(id: ExtractorId, fields: &[(Field, &str)]) -> ExtractorOutput {
        ExtractorOutput {
            id,
            pins_entry_type: false,
            record: make_record(fields),
        }
    }

    #[test]
    fn test_site_specific_title_outranks_meta() {
        let outputs = vec![
            output(Webpage, &[(Field::Title, "Page title | Site")]),
            output(Meta, &[(Field::Title, "Meta title")]),
            output(Arxiv, &[(Field::Title, "arXiv title")]),
        ];
        let merged = merge(&outputs);
        assert_eq!(merged.get(Field::Title), Some("arXiv title"));
    }

    #[test]
    fn test_meta_outranks_structured_data() {
        let outputs = vec![
            output(JsonLd, &[(Field::Title, "LD title"), (Field::Abstract, "LD abstract")]),
            output(Meta, &[(Field::Title, "Meta title")]),
        ];
        let merged = merge(&outputs);
        assert_eq!(merged.get(Field::Title), Some("Meta title"));
        assert_eq!(merged.get(Field::Abstract), Some("LD abstract"));
    }

    #[test]
    fn test_doi_extractor_is_a_fallback() {
        let with_meta = vec![
            output(Doi, &[(Field::Doi, "10.5555/from-url")]),
            output(Meta, &[(Field::Doi, "10.5555/from-meta")]),
        ];
        assert_eq!(merge(&with_meta).get(Field::Doi), Some("10.5555/from-meta"));

        let alone = vec![output(Doi, &[(Field::Doi, "10.5555/from-url")])];
        assert_eq!(merge(&alone).get(Field::Doi), Some("10.5555/from-url"));
    }

    #[test]
    fn test_heuristics_only_fill_gaps() {
        let outputs = vec![
            output(Publisher, &[(Field::Volume, "9"), (Field::Pages, "1--2")]),
            output(Meta, &[(Field::Volume, "12")]),
        ];
        let merged = merge(&outputs);
        assert_eq!(merged.get(Field::Volume), Some("12"));
        assert_eq!(merged.get(Field::Pages), Some("1--2"));
    }

    #[test]
    fn test_unlisted_extractor_is_ignored_for_field() {
        // Publisher heuristics are not trusted for titles.
        let outputs = vec![output(Publisher, &[(Field::Title, "Vol. 3")])];
        assert!(!merge(&outputs).has(Field::Title));
    }

    #[test]
    fn test_entry_type_is_not_merged() {
        let outputs = vec![output(JsonLd, &[(Field::EntryType, "book")])];
        assert!(merge(&outputs).is_empty());
    }

    #[test]
    fn test_merge_is_deterministic_and_order_insensitive() {
        let a = vec![
            output(Meta, &[(Field::Title, "M"), (Field::Year, "2020")]),
            output(Webpage, &[(Field::Title, "W"), (Field::SiteName, "Site")]),
            output(JsonLd, &[(Field::Year, "2019"), (Field::Publisher, "P")]),
        ];
        let mut b = a.clone();
        b.reverse();

        let first = merge(&a);
        assert_eq!(first, merge(&a));
        assert_eq!(first, merge(&b));
        assert_eq!(first.get(Field::Year), Some("2020"));
        assert_eq!(first.get(Field::SiteName), Some("Site"));
    }

    #[test]
    fn test_date_comes_from_one_source() {
        let outputs = vec![
            output(Meta, &[(Field::Year, "2019")]),
            output(JsonLd, &[(Field::Year, "2020"), (Field::Month, "may"), (Field::Day, "3")]),
        ];
        let merged = merge(&outputs);
        assert_eq!(merged.get(Field::Year), Some("2019"));
        assert_eq!(merged.get(Field::Month), None);
        assert_eq!(merged.get(Field::Day), None);

        let outputs = vec![
            output(Meta, &[(Field::Year, "2019"), (Field::Month, "jan")]),
            output(JsonLd, &[(Field::Year, "2020"), (Field::Month, "may"), (Field::Day, "3")]),
        ];
        let merged = merge(&outputs);
        assert_eq!(merged.get(Field::Month), Some("jan"));
        assert_eq!(merged.get(Field::Day), None);
    }

    #[test]
    fn test_month_without_any_year_still_merges() {
        let outputs = vec![output(Webpage, &[(Field::Month, "oct")])];
        assert_eq!(merge(&outputs).get(Field::Month), Some("oct"));
    }

    #[test]
    fn test_empty_outputs() {
        assert!(merge(&[]).is_empty());
    }
}
