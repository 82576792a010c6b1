//! Note and subject extensions on national common records.
//!
//! Libraries that do not own a national common record may still annotate it
//! with note and subject fields. The handler here checks that an update from
//! such a library touches nothing outside the extensible fields, and stamps
//! the fields it may touch with a `&` ownership marker before they are
//! stored.

use crate::agency::RAWREPO_COMMON_AGENCY_ID;
use crate::error::Result;
use crate::messages::ValidationMessage;
use crate::record::{Field, Record};
use crate::repository::RawRepo;
use crate::tag_set::TagSet;

/// Catalogue codes that mark a record as nationally maintained but not
/// open for extension.
const CLOSED_CATALOGUE_CODES: [&str; 3] = ["BKM", "NET", "SF"];

/// Validates and rewrites note/subject extensions against the stored state
/// of a national common record.
#[derive(Debug)]
pub struct ExtensionsHandler<'a, R> {
    repo: &'a R,
    extensible_fields: &'a TagSet,
}

impl<'a, R: RawRepo> ExtensionsHandler<'a, R> {
    /// Create a handler over a repository and the set of extensible field
    /// tags.
    pub fn new(repo: &'a R, extensible_fields: &'a TagSet) -> Self {
        ExtensionsHandler {
            repo,
            extensible_fields,
        }
    }

    /// Check that an update only extends a national common record.
    ///
    /// Returns one error per field the group may not add, change or delete.
    /// Records without a stored common version, and stored records that are
    /// not national common records, pass without messages.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn authenticate_extensions(
        &self,
        record: &Record,
        group_id: &str,
    ) -> Result<Vec<ValidationMessage>> {
        let record_id = record.record_id().unwrap_or("");
        let mut stored = match self.repo.fetch_record(record_id, RAWREPO_COMMON_AGENCY_ID)? {
            Some(stored) => stored,
            None => return Ok(Vec::new()),
        };
        // align the stored agency so 001 comparisons see the same record key
        if let Some(agency) = record.agency_id() {
            stored.set_first_value("001", 'b', agency);
        }
        if !is_national_common_record(&stored) {
            return Ok(Vec::new());
        }

        let mut messages = Vec::new();
        for field in record.fields() {
            if self.extensible_fields.contains(&field.tag) {
                continue;
            }
            if !has_matching_field(&stored, field) {
                messages.push(ValidationMessage::record_error(format!(
                    "Brugeren '{group_id}' har ikke ret til at rette/tilføje feltet '{}' i posten '{record_id}'",
                    field.tag
                )));
            }
        }
        for field in stored.fields() {
            if self.extensible_fields.contains(&field.tag) {
                continue;
            }
            if !has_matching_field(record, field)
                && record.field_count(&field.tag) != stored.field_count(&field.tag)
            {
                messages.push(ValidationMessage::record_error(format!(
                    "Brugeren '{group_id}' har ikke ret til at slette feltet '{}' i posten '{record_id}'",
                    field.tag
                )));
            }
        }
        Ok(messages)
    }

    /// Stamp the extensible fields of an update with the editing group's
    /// `&` ownership marker.
    ///
    /// Records whose stored common version is missing or not a national
    /// common record are returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn record_data_for_raw_repo(&self, record: &Record, group_id: &str) -> Result<Record> {
        let record_id = record.record_id().unwrap_or("");
        let national = match self.repo.fetch_record(record_id, RAWREPO_COMMON_AGENCY_ID)? {
            Some(stored) => is_national_common_record(&stored),
            None => false,
        };
        if !national {
            return Ok(record.clone());
        }

        let mut result = record.clone();
        for field in result.fields_mut() {
            if self.extensible_fields.contains(&field.tag) {
                field.remove_subfields('&');
                field.insert_subfield(0, '&', group_id);
            }
        }
        Ok(result)
    }
}

/// Check whether a record is a national common record: owned by DBC and
/// carrying at least one 032 catalogue field that is not closed for
/// extension.
#[must_use]
pub fn is_national_common_record(record: &Record) -> bool {
    if record.owner() != Some("DBC") {
        return false;
    }
    record.fields_by_tag("032").any(|f| {
        f.values('a').any(|v| !v.is_empty())
            && !f.values('x').any(|v| {
                CLOSED_CATALOGUE_CODES
                    .iter()
                    .any(|code| v.starts_with(code))
            })
    })
}

/// Check whether the record contains a field equal to the probe, ignoring
/// subfield order. For a 001 probe the candidate's c/d timestamps are
/// aligned to the probe first.
fn has_matching_field(record: &Record, probe: &Field) -> bool {
    record.fields_by_tag(&probe.tag).any(|candidate| {
        if probe.tag == "001" {
            align_001_dates(candidate, probe).eq_ignoring_subfield_order(probe)
        } else {
            candidate.eq_ignoring_subfield_order(probe)
        }
    })
}

fn align_001_dates(candidate: &Field, probe: &Field) -> Field {
    let mut aligned = candidate.clone();
    for name in ['c', 'd'] {
        if let Some(value) = probe.first_value(name) {
            aligned.set_subfield(name, value);
        }
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepo;
    use crate::tag_set::EXTENTABLE_NOTE_FIELDS;

    fn field(tag: &str, subfields: &[(char, &str)]) -> Field {
        let mut f = Field::new(tag, "00");
        for (name, value) in subfields {
            f.add_subfield(*name, *value);
        }
        f
    }

    fn national_record(record_id: &str, agency_id: &str) -> Record {
        Record {
            fields: vec![
                field("001", &[('a', record_id), ('b', agency_id)]),
                field("004", &[('a', "e"), ('r', "n")]),
                field("032", &[('a', "DBF201602")]),
                field("245", &[('a', "Titel")]),
                field("996", &[('a', "DBC")]),
            ],
        }
    }

    fn repo_with(record: Record) -> MemoryRepo {
        let mut repo = MemoryRepo::new();
        repo.add_record(record).unwrap();
        repo
    }

    #[test]
    fn test_national_common_record_detection() {
        assert!(is_national_common_record(&national_record("x", "191919")));

        let mut not_dbc = national_record("x", "191919");
        not_dbc.set_first_value("996", 'a', "714700");
        assert!(!is_national_common_record(&not_dbc));

        let mut closed = national_record("x", "191919");
        closed.remove_fields("032");
        closed.add_field(field("032", &[('a', "DBF201602"), ('x', "BKM201602")]));
        assert!(!is_national_common_record(&closed));

        let mut no_catalogue = national_record("x", "191919");
        no_catalogue.remove_fields("032");
        assert!(!is_national_common_record(&no_catalogue));
    }

    #[test]
    fn test_extensible_edit_passes() {
        let repo = repo_with(national_record("20611529", "191919"));
        let handler = ExtensionsHandler::new(&repo, &EXTENTABLE_NOTE_FIELDS);

        let mut update = national_record("20611529", "870970");
        update.add_field(field("504", &[('a', "Ny note")]));

        let messages = handler.authenticate_extensions(&update, "714700").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_changing_protected_field_is_reported() {
        let repo = repo_with(national_record("20611529", "191919"));
        let handler = ExtensionsHandler::new(&repo, &EXTENTABLE_NOTE_FIELDS);

        let mut update = national_record("20611529", "870970");
        update.set_first_value("245", 'a', "Omdøbt titel");

        let messages = handler.authenticate_extensions(&update, "714700").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].message(),
            "Brugeren '714700' har ikke ret til at rette/tilføje feltet '245' i posten '20611529'"
        );
    }

    #[test]
    fn test_deleting_protected_field_is_reported() {
        let repo = repo_with(national_record("20611529", "191919"));
        let handler = ExtensionsHandler::new(&repo, &EXTENTABLE_NOTE_FIELDS);

        let mut update = national_record("20611529", "870970");
        update.remove_fields("245");

        let messages = handler.authenticate_extensions(&update, "714700").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].message(),
            "Brugeren '714700' har ikke ret til at slette feltet '245' i posten '20611529'"
        );
    }

    #[test]
    fn test_001_timestamps_do_not_trip_the_check() {
        let mut stored = national_record("20611529", "191919");
        stored.set_first_value("001", 'c', "20250101120000");
        stored.set_first_value("001", 'd', "20250101");
        let repo = repo_with(stored);
        let handler = ExtensionsHandler::new(&repo, &EXTENTABLE_NOTE_FIELDS);

        let mut update = national_record("20611529", "870970");
        update.set_first_value("001", 'c', "20260826140000");
        update.set_first_value("001", 'd', "20260826");

        let messages = handler.authenticate_extensions(&update, "714700").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_no_stored_record_passes_untouched() {
        let repo = MemoryRepo::new();
        let handler = ExtensionsHandler::new(&repo, &EXTENTABLE_NOTE_FIELDS);

        let update = national_record("20611529", "870970");
        let messages = handler.authenticate_extensions(&update, "714700").unwrap();
        assert!(messages.is_empty());

        let data = handler.record_data_for_raw_repo(&update, "714700").unwrap();
        assert_eq!(data, update);
    }

    #[test]
    fn test_marker_stamped_on_extensible_fields_only() {
        let repo = repo_with(national_record("20611529", "191919"));
        let handler = ExtensionsHandler::new(&repo, &EXTENTABLE_NOTE_FIELDS);

        let mut update = national_record("20611529", "870970");
        update.add_field(field("504", &[('a', "Ny note")]));
        update.add_field(field("666", &[('&', "714700"), ('f', "krimi")]));

        let data = handler.record_data_for_raw_repo(&update, "761500").unwrap();
        let note = data.first_field("504").unwrap();
        assert_eq!(note.subfields().next().map(|sf| sf.name), Some('&'));
        assert_eq!(note.first_value('&'), Some("761500"));
        // a stale marker is replaced, not doubled
        let subject = data.first_field("666").unwrap();
        assert_eq!(subject.values('&').collect::<Vec<_>>(), vec!["761500"]);
        // protected fields stay unmarked
        assert!(!data.first_field("245").unwrap().has_subfield('&'));
    }
}
