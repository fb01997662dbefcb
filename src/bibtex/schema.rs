//! Entry-type schemas: which record fields each BibTeX entry type uses and
//! what they are called.

use crate::models::{EntryType, Field};

/// Field layout of one entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySchema {
    /// Record field supplying the venue, and its BibTeX name
    pub venue: Option<(Field, &'static str)>,
    /// Record field supplying the publisher or organisation, and its BibTeX name
    pub publisher: Option<(Field, &'static str)>,
    /// Whether `volume`, `number` and `pages` apply
    pub uses_volume_pages: bool,
    /// Whether `urldate` is written when a URL is present
    pub uses_access_date: bool,
    /// Type-specific fields written after the publisher
    pub extras: &'static [(Field, &'static str)],
}

const NO_EXTRAS: &[(Field, &str)] = &[];
const EPRINT: &[(Field, &str)] = &[(Field::Eprint, "eprint"), (Field::ArchivePrefix, "archivePrefix")];
const ISBN: &[(Field, &str)] = &[(Field::Isbn, "isbn")];
const ISSN: &[(Field, &str)] = &[(Field::Issn, "issn")];

const fn schema(
    venue: Option<(Field, &'static str)>,
    publisher: Option<(Field, &'static str)>,
    uses_volume_pages: bool,
    uses_access_date: bool,
    extras: &'static [(Field, &'static str)],
) -> EntrySchema {
    EntrySchema {
        venue,
        publisher,
        uses_volume_pages,
        uses_access_date,
        extras,
    }
}

const PUBLISHER: Option<(Field, &str)> = Some((Field::Publisher, "publisher"));
const ORGANIZATION: Option<(Field, &str)> = Some((Field::Organization, "organization"));

/// The schema table, one row per entry type
pub const SCHEMAS: &[(EntryType, EntrySchema)] = &[
    (
        EntryType::Article,
        schema(Some((Field::Journal, "journal")), PUBLISHER, true, false, ISSN),
    ),
    (
        EntryType::Inproceedings,
        schema(Some((Field::Conference, "booktitle")), PUBLISHER, true, false, NO_EXTRAS),
    ),
    (EntryType::Proceedings, schema(None, PUBLISHER, true, false, ISBN)),
    (EntryType::Book, schema(None, PUBLISHER, false, false, ISBN)),
    (
        EntryType::Incollection,
        schema(Some((Field::Journal, "booktitle")), PUBLISHER, true, false, ISBN),
    ),
    (
        EntryType::Phdthesis,
        schema(Some((Field::Publisher, "school")), None, false, false, NO_EXTRAS),
    ),
    (
        EntryType::Mastersthesis,
        schema(Some((Field::Publisher, "school")), None, false, false, NO_EXTRAS),
    ),
    (
        EntryType::Techreport,
        schema(Some((Field::Publisher, "institution")), None, true, false, NO_EXTRAS),
    ),
    (
        EntryType::Report,
        schema(Some((Field::Publisher, "institution")), None, false, false, NO_EXTRAS),
    ),
    (
        EntryType::Online,
        schema(Some((Field::SiteName, "organization")), PUBLISHER, false, true, NO_EXTRAS),
    ),
    (
        EntryType::Misc,
        schema(Some((Field::SiteName, "howpublished")), PUBLISHER, false, true, EPRINT),
    ),
    (
        EntryType::Software,
        schema(Some((Field::SiteName, "howpublished")), ORGANIZATION, false, true, NO_EXTRAS),
    ),
    (
        EntryType::Dataset,
        schema(Some((Field::SiteName, "howpublished")), PUBLISHER, false, true, NO_EXTRAS),
    ),
    (
        EntryType::Video,
        schema(Some((Field::SiteName, "howpublished")), PUBLISHER, false, true, NO_EXTRAS),
    ),
    (
        EntryType::ArticleNewspaper,
        schema(Some((Field::SiteName, "journal")), PUBLISHER, false, true, NO_EXTRAS),
    ),
    (
        EntryType::ArticleMagazine,
        schema(Some((Field::SiteName, "journal")), PUBLISHER, true, true, ISSN),
    ),
    (
        EntryType::ArticleBlog,
        schema(Some((Field::SiteName, "howpublished")), None, false, true, NO_EXTRAS),
    ),
    (EntryType::Patent, schema(None, ORGANIZATION, false, false, NO_EXTRAS)),
    (EntryType::Standard, schema(None, ORGANIZATION, false, false, NO_EXTRAS)),
    (EntryType::Manual, schema(None, ORGANIZATION, false, false, NO_EXTRAS)),
    (EntryType::Unpublished, schema(None, None, false, false, NO_EXTRAS)),
];

/// Schema for an entry type
pub fn schema_for(entry_type: EntryType) -> EntrySchema {
    SCHEMAS
        .iter()
        .find(|(t, _)| *t == entry_type)
        .map(|(_, s)| *s)
        .unwrap_or(MISC_SCHEMA)
}

const MISC_SCHEMA: EntrySchema =
    schema(Some((Field::SiteName, "howpublished")), PUBLISHER, false, true, EPRINT);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_type_has_a_schema() {
        for entry_type in EntryType::ALL {
            assert!(
                SCHEMAS.iter().any(|(t, _)| *t == entry_type),
                "missing schema for {}",
                entry_type
            );
        }
        assert_eq!(SCHEMAS.len(), EntryType::ALL.len());
    }

    #[test]
    fn test_thesis_venue_is_school() {
        let schema = schema_for(EntryType::Phdthesis);
        assert_eq!(schema.venue.map(|(_, name)| name), Some("school"));
        assert!(!schema.uses_volume_pages);
    }

    #[test]
    fn test_web_types_use_access_date() {
        for t in [EntryType::Online, EntryType::Misc, EntryType::ArticleBlog, EntryType::Video] {
            assert!(schema_for(t).uses_access_date, "{} should use urldate", t);
        }
        assert!(!schema_for(EntryType::Article).uses_access_date);
    }

    #[test]
    fn test_misc_carries_eprint() {
        assert_eq!(schema_for(EntryType::Misc).extras, EPRINT);
    }
}
