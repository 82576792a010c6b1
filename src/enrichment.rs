//! Enrichment record synchronization.
//!
//! When a shared record changes, every library's enrichment record must be
//! brought back in line with it: classification data is copied in or dropped,
//! a recategorization leaves a human-readable trace, and enrichment records
//! reduced to nothing but control fields collapse to an empty record so the
//! caller knows the overlay can be deleted.
//!
//! All functions are pure over their inputs. Timestamps enter through the
//! `adjustment_time` argument of [`create_record`] so callers control the
//! clock.
//!
//! # Examples
//!
//! ```ignore
//! use opencat_rules::enrichment;
//! use opencat_rules::DEFAULT_CLASSIFICATION_FIELDS;
//!
//! let corrected = enrichment::correct_record(&DEFAULT_CLASSIFICATION_FIELDS, &shared, &overlay);
//! if corrected.is_empty() {
//!     // the overlay no longer contributes anything
//! }
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::agency::{RAWREPO_COMMON_AGENCY_ID, RAWREPO_DBC_ENRICHMENT_AGENCY_ID};
use crate::classification::{
    has_classification_data, has_classifications_changed, remove_classifications_from_record,
    update_classifications_in_record,
};
use crate::material_codes;
use crate::record::{Field, Record, IGNORABLE_SUBFIELDS};
use crate::sort::insert_field_sorted;
use crate::tag_set::{TagSet, RECORD_CONTROL_FIELDS, REFERENCE_FIELDS};

/// Create a fresh enrichment record for an agency from a pair of shared
/// record versions.
///
/// The new record gets a generated 001 (id from `updating_shared`, agency
/// from `agency_id`, creation and adjustment dates from `adjustment_time`)
/// and is then updated like an existing enrichment record. `adjustment_time`
/// is a `YYYYMMDDhhmmss` timestamp; its first eight characters become the
/// creation date.
#[must_use]
pub fn create_record(
    fields: &TagSet,
    current_shared: &Record,
    updating_shared: &Record,
    agency_id: &str,
    adjustment_time: &str,
) -> Record {
    let creation_date: String = adjustment_time.chars().take(8).collect();
    let mut f001 = Field::new("001", "00");
    f001.add_subfield('a', updating_shared.record_id().unwrap_or(""));
    f001.add_subfield('b', agency_id);
    f001.add_subfield('c', adjustment_time);
    f001.add_subfield('d', creation_date);
    f001.add_subfield('f', "a");

    let mut enrichment = Record::new();
    enrichment.add_field(f001);
    update_record(fields, current_shared, updating_shared, &enrichment)
}

/// Update an enrichment record after its shared record changed from
/// `current_shared` to `updating_shared`.
#[must_use]
pub fn update_record(
    fields: &TagSet,
    current_shared: &Record,
    updating_shared: &Record,
    enrichment: &Record,
) -> Record {
    let mut result = update_classifications_in_record(fields, current_shared, enrichment);

    if is_recategorization(current_shared, updating_shared) {
        debug!("shared record was recategorized, dropping copied classifications");
        result = remove_classifications_from_record(fields, &result);
        if let Some(note) = recategorization_note(current_shared) {
            insert_field_sorted(&mut result, note);
            let mut marker = Field::new("y08", "00");
            marker.add_subfield('a', "UPDATE posttypeskift");
            insert_field_sorted(&mut result, marker);
        }
    }

    result.remove_fields("004");
    for field in updating_shared.fields_by_tag("004") {
        insert_field_sorted(&mut result, field.clone());
    }

    correct_record_if_empty(&result)
}

/// Correct an enrichment record against the current state of its shared
/// record.
///
/// Classification fields are dropped from the enrichment when the shared
/// record carries classification data the enrichment does not diverge from;
/// fields merely repeating shared content are cleaned up; a record reduced
/// to control fields collapses to empty.
#[must_use]
pub fn correct_record(fields: &TagSet, shared: &Record, enrichment: &Record) -> Record {
    let mut result = if has_classification_data(fields, shared)
        && !has_classifications_changed(fields, shared, enrichment)
    {
        remove_classifications_from_record(fields, enrichment)
    } else {
        enrichment.clone()
    };
    result = cleanup_enrichment_record(fields, shared, &result);
    correct_record_if_empty(&result)
}

/// Collapse a record that no longer contributes anything.
///
/// Records keyed to the common or DBC enrichment agencies are never
/// collapsed, and neither are records carrying 004n (PH library volumes
/// keep their overlay even when otherwise empty). Any other record whose
/// fields are all control fields (001, 004, 996) becomes an empty record.
#[must_use]
pub fn correct_record_if_empty(record: &Record) -> Record {
    let agency = record.agency_id().unwrap_or("");
    if agency == RAWREPO_DBC_ENRICHMENT_AGENCY_ID || agency == RAWREPO_COMMON_AGENCY_ID {
        return record.clone();
    }
    if record.fields_by_tag("004").any(|f| f.has_subfield('n')) {
        return record.clone();
    }
    if record.fields().all(|f| RECORD_CONTROL_FIELDS.contains(&f.tag)) {
        debug!("enrichment record holds only control fields, collapsing to empty");
        return Record::new();
    }
    record.clone()
}

/// Check whether an update to a shared record changes its material
/// categorization.
///
/// Fires on a 004a flip between `e` and `b`, on 008t becoming or ceasing to
/// be `p`, and on any difference in the resolved 009 a/g material codes.
#[must_use]
pub fn is_recategorization(current: &Record, updating: &Record) -> bool {
    let current_004a = current.first_value("004", 'a');
    let updating_004a = updating.first_value("004", 'a');
    if matches!(
        (current_004a, updating_004a),
        (Some("e"), Some("b")) | (Some("b"), Some("e"))
    ) {
        return true;
    }

    let current_is_periodical = current.first_value("008", 't') == Some("p");
    let updating_is_periodical = updating.first_value("008", 't') == Some("p");
    if current_is_periodical != updating_is_periodical {
        return true;
    }

    match (sorted_categorization(current), sorted_categorization(updating)) {
        (None, None) => false,
        (None, Some(_)) | (Some(_), None) => true,
        (Some(cur), Some(upd)) => cur != upd,
    }
}

/// Build the 512 note documenting the categorization a record is leaving
/// behind, or `None` when no material description can be derived.
#[must_use]
pub fn recategorization_note(record: &Record) -> Option<Field> {
    let description = describe_categorization(record)?;
    let mut field = Field::new("512", "00");
    field.add_subfield('i', "Tidligere kategorisering");
    field.add_subfield('t', description);
    Some(field)
}

fn sorted_categorization(record: &Record) -> Option<BTreeMap<char, Vec<String>>> {
    material_codes::categorization(record).map(|mut map| {
        for values in map.values_mut() {
            values.sort();
        }
        map
    })
}

fn describe_categorization(record: &Record) -> Option<String> {
    let categorization = material_codes::categorization(record)?;
    let mut parts: Vec<String> = Vec::new();
    for values in categorization.values() {
        for value in values {
            if !parts.contains(value) {
                parts.push(value.clone());
            }
        }
    }
    if parts.is_empty() {
        return None;
    }
    let mut description = parts.join(", ");
    if let Some(title) = record.first_value("245", 'a') {
        description.push_str(": ");
        description.push_str(title);
    }
    Some(description)
}

/// Drop enrichment fields that only repeat shared record content.
fn cleanup_enrichment_record(fields: &TagSet, shared: &Record, enrichment: &Record) -> Record {
    Record {
        fields: enrichment
            .fields()
            .filter(|f| keep_enrichment_field(fields, shared, enrichment, f))
            .cloned()
            .collect(),
    }
}

fn keep_enrichment_field(
    fields: &TagSet,
    shared: &Record,
    enrichment: &Record,
    field: &Field,
) -> bool {
    if fields.contains(&field.tag) || RECORD_CONTROL_FIELDS.contains(&field.tag) {
        return true;
    }
    if !shared.has_field(&field.tag) {
        return true;
    }
    if REFERENCE_FIELDS.contains(&field.tag) {
        return keep_reference_field(enrichment, field);
    }
    let stripped = field.without_subfields(&IGNORABLE_SUBFIELDS);
    !shared
        .fields_by_tag(&field.tag)
        .any(|sf| sf.without_subfields(&IGNORABLE_SUBFIELDS) == stripped)
}

/// A reference field survives only while the field its z pointer names is
/// still present. Pointers longer than four characters carry an occurrence
/// suffix; only their first three characters name the tag.
fn keep_reference_field(enrichment: &Record, field: &Field) -> bool {
    match field.first_value('z') {
        None => false,
        Some(value) => {
            let pointer: String = if value.chars().count() > 4 {
                value.chars().take(3).collect()
            } else {
                value.to_string()
            };
            enrichment.has_field(&pointer)
        }
    }
}
