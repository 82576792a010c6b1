//! Material designation codes from field 009.
//!
//! Subfields 009a (general material designation) and 009g (special material
//! designation) carry coded values. The code table maps them to display
//! values; a mapped value that is itself a code is substituted recursively,
//! so carrier codes collapse into their material category before records are
//! compared.

use std::collections::BTreeMap;

use lazy_static::lazy_static;

use crate::record::Record;

lazy_static! {
    static ref MATERIAL_CODES: BTreeMap<&'static str, &'static str> = BTreeMap::from([
        ("a", "tekst"),
        ("b", "håndskrift"),
        ("c", "musikalier"),
        ("d", "musikhåndskrift"),
        ("e", "kartografisk materiale"),
        ("f", "kartografisk håndskrift"),
        ("g", "billedmateriale"),
        ("m", "film"),
        ("p", "punktskrift"),
        ("r", "lydoptagelser"),
        ("s", "musikoptagelser"),
        ("t", "elektronisk materiale"),
        ("u", "genstand"),
        ("v", "sammensat materiale"),
        // carrier codes collapse into the electronic material category
        ("xe", "t"),
        ("xx", "t"),
    ]);
}

/// Resolve a material code to its display value.
///
/// A mapped value that is itself a code is substituted recursively; unknown
/// codes resolve to themselves. Cyclic table entries terminate at the first
/// revisited code.
///
/// # Examples
///
/// ```
/// use opencat_rules::material_codes::resolve;
///
/// assert_eq!(resolve("a"), "tekst");
/// assert_eq!(resolve("xe"), "elektronisk materiale");
/// assert_eq!(resolve("q"), "q");
/// ```
#[must_use]
pub fn resolve(code: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    let mut current = code;
    while let Some(&next) = MATERIAL_CODES.get(current) {
        if seen.contains(&current) {
            break;
        }
        seen.push(current);
        current = next;
    }
    current.to_string()
}

/// The resolved 009 a/g values of a record, grouped by subfield name.
///
/// Returns `None` when the record carries no 009 field with an `a` or `g`
/// subfield. Values keep their field order; repeated 009 fields contribute
/// in record order.
#[must_use]
pub fn categorization(record: &Record) -> Option<BTreeMap<char, Vec<String>>> {
    let mut result: BTreeMap<char, Vec<String>> = BTreeMap::new();
    for field in record.fields_by_tag("009") {
        for sf in field.subfields().filter(|sf| sf.name == 'a' || sf.name == 'g') {
            result
                .entry(sf.name)
                .or_default()
                .push(resolve(&sf.value));
        }
    }
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
