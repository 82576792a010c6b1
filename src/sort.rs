//! Pure ordering helpers for fields and subfields.
//!
//! Repository records keep their fields in lexicographic tag order, with
//! digits sorting before letters, so control fields (`001`, `004`, `996`)
//! come first and local fields (`d08`, `s10`, `z98`) follow. Subfields are
//! displayed in an explicit per-field order where an uppercase name sorts
//! immediately before its lowercase twin and unknown names keep their
//! relative order at the end.
//!
//! Both helpers are pure: they take the ordering as input and leave their
//! arguments untouched.

use crate::record::{Field, Record};

/// Insert a field at its lexicographic tag position.
///
/// The field is placed before the first field with a greater tag, after any
/// fields with an equal tag.
///
/// # Examples
///
/// ```ignore
/// use opencat_rules::sort::insert_field_sorted;
///
/// // d08 < d09 < s10 < s12 < z98
/// insert_field_sorted(&mut record, Field::builder("s10", "00").subfield('a', "714700").build());
/// ```
pub fn insert_field_sorted(record: &mut Record, field: Field) {
    let position = record
        .fields
        .iter()
        .position(|f| f.tag.as_str() > field.tag.as_str())
        .unwrap_or(record.fields.len());
    record.insert_field(position, field);
}

/// Sort the subfields of a field by an explicit order of names.
///
/// Returns a new field whose subfields are stably reordered so that names
/// appear in the order given. An uppercase name sorts immediately before its
/// lowercase counterpart; names not in the order keep their relative order
/// after all ordered names.
#[must_use]
pub fn sort_subfields(field: &Field, order: &str) -> Field {
    let mut sorted = field.clone();
    // two slots per ordered name leave room for the uppercase twin in front
    sorted.subfields.sort_by_key(|sf| subfield_rank(sf.name, order));
    sorted
}

fn subfield_rank(name: char, order: &str) -> usize {
    let lower = name.to_lowercase().next().unwrap_or(name);
    match order.chars().position(|c| c == lower) {
        Some(index) if name.is_uppercase() => index * 2 + 1,
        Some(index) => index * 2 + 2,
        None => usize::MAX,
    }
}
