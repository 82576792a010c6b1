//! Ownership history merging for field 996.
//!
//! When a common record changes hands, the previous owners are preserved on
//! the 996 field: `o` keeps the original owner and repeated `m` subfields
//! list the libraries the record has passed through. Merging is only
//! performed for takeovers between libraries (current owner in the 7xxxxx
//! range) and never when the record is being released with the `RET`
//! marker.

use crate::record::{Field, Record};
use crate::sort::insert_field_sorted;

/// Ownership value releasing a common record for any library to take over.
pub const RELEASED_OWNER: &str = "RET";

/// Merge the ownership history of a stored record into an update.
///
/// With unchanged ownership the stored 996 fields replace the update's, so
/// accumulated history is never lost. On a takeover the update gets a
/// rebuilt 996 carrying the new owner in `a`, the original owner in `o` and
/// the deduplicated previous owners in `m` subfields. Updates or stored
/// records without an owner are returned unchanged.
#[must_use]
pub fn merge_ownership(record: &Record, stored: &Record) -> Record {
    let new_owner = match record.owner() {
        Some(owner) => owner,
        None => return record.clone(),
    };
    let stored_owner = match stored.owner() {
        Some(owner) => owner,
        None => return record.clone(),
    };

    let mut result = record.clone();
    if new_owner == stored_owner {
        result.remove_fields("996");
        for field in stored.fields_by_tag("996") {
            insert_field_sorted(&mut result, field.clone());
        }
        return result;
    }
    if !stored_owner.starts_with('7') || new_owner == RELEASED_OWNER {
        return result;
    }

    let original_owner = stored.first_value("996", 'o').unwrap_or(stored_owner);
    let mut previous: Vec<&str> = Vec::new();
    for owner in stored
        .values("996", 'm')
        .chain(std::iter::once(stored_owner))
    {
        if owner != new_owner && !previous.contains(&owner) {
            previous.push(owner);
        }
    }

    let mut f996 = Field::new("996", "00");
    f996.add_subfield('a', new_owner);
    f996.add_subfield('o', original_owner);
    for owner in previous {
        f996.add_subfield('m', owner);
    }
    result.remove_fields("996");
    insert_field_sorted(&mut result, f996);
    result
}
