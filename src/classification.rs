//! Classification change rules.
//!
//! A library's enrichment record must follow the classification data of the
//! shared record it enriches. The functions here decide whether an update to
//! the shared record changes that classification data, and copy or remove
//! classification fields on a target record.
//!
//! [`has_classifications_changed`] evaluates one rule per classification tag
//! in a fixed priority order and short-circuits on the first rule that
//! fires. Values are compared in the canonical compare form of
//! [`normalize::strip`](crate::normalize::strip) unless a rule states
//! otherwise; a handful of rules additionally truncate to the first ten
//! characters, matching the comparison depth of the upstream cataloguing
//! practice.
//!
//! # Examples
//!
//! ```ignore
//! use opencat_rules::classification;
//! use opencat_rules::DEFAULT_CLASSIFICATION_FIELDS;
//!
//! if classification::has_classifications_changed(&DEFAULT_CLASSIFICATION_FIELDS, &old, &new) {
//!     // enrichment records must be corrected
//! }
//! ```

use tracing::debug;

use crate::normalize::{strip, strip_cut};
use crate::record::{Field, Record, IGNORABLE_SUBFIELDS};
use crate::tag_set::TagSet;

/// Comparison depth of the truncating rules.
const COMPARE_CUT: usize = 10;
/// Cut value leaving the compare form untruncated.
const NO_CUT: usize = usize::MAX;

/// Check whether a record carries any classification data.
#[must_use]
pub fn has_classification_data(fields: &TagSet, record: &Record) -> bool {
    record.fields().any(|f| fields.contains(&f.tag))
}

/// Check whether classification data differs between two versions of a
/// record.
///
/// Rules are evaluated in fixed order (008, 009, 038/039, 100, 110, 239 with
/// 245, remaining 245 subfields, 652); the first firing rule decides. A rule
/// only runs when its tag is in `fields`.
#[must_use]
pub fn has_classifications_changed(fields: &TagSet, old: &Record, new: &Record) -> bool {
    if fields.contains("008") && check_008(old, new) {
        debug!("classification changed in field 008");
        return true;
    }
    if fields.contains("009") && check_009(old, new) {
        debug!("classification changed in field 009");
        return true;
    }
    if (fields.contains("038") || fields.contains("039")) && check_038_039(fields, old, new) {
        debug!("classification changed in fields 038/039");
        return true;
    }
    if fields.contains("100") && check_agent_field(old, new, "100", &['a', 'h', 'k', 'e', 'f']) {
        debug!("classification changed in field 100");
        return true;
    }
    if fields.contains("110")
        && check_agent_field(old, new, "110", &['s', 'a', 'c', 'e', 'i', 'k', 'j'])
    {
        debug!("classification changed in field 110");
        return true;
    }
    if fields.contains("239") && check_239_and_245(old, new) {
        debug!("classification changed in fields 239/245a");
        return true;
    }
    if fields.contains("245") && check_245(old, new) {
        debug!("classification changed in field 245");
        return true;
    }
    if fields.contains("652") && check_652(old, new) {
        debug!("classification changed in field 652");
        return true;
    }
    false
}

/// Copy the classification fields of `current_common` onto a copy of
/// `target`, unless the target already carries classification data of its
/// own.
#[must_use]
pub fn update_classifications_in_record(
    fields: &TagSet,
    current_common: &Record,
    target: &Record,
) -> Record {
    let mut result = target.clone();
    if !has_classification_data(fields, target) {
        for field in current_common.fields().filter(|f| fields.contains(&f.tag)) {
            result.add_field(field.clone());
        }
    }
    result
}

/// A copy of the record without its classification fields.
#[must_use]
pub fn remove_classifications_from_record(fields: &TagSet, record: &Record) -> Record {
    Record {
        fields: record
            .fields()
            .filter(|f| !fields.contains(&f.tag))
            .cloned()
            .collect(),
    }
}

/// 008: material type leaves the monograph family for periodical.
fn check_008(old: &Record, new: &Record) -> bool {
    let old_t = old.values("008", 't').next();
    let new_t = new.values("008", 't').next();
    matches!(old_t, Some("m" | "s")) && new_t == Some("p")
}

/// 009: the first a or g material code differs, raw.
fn check_009(old: &Record, new: &Record) -> bool {
    old.values("009", 'a').next().unwrap_or("")
        != new.values("009", 'a').next().unwrap_or("")
        || old.values("009", 'g').next().unwrap_or("")
            != new.values("009", 'g').next().unwrap_or("")
}

/// 038/039: the sub-records of both tags must match as unordered sets.
fn check_038_039(fields: &TagSet, old: &Record, new: &Record) -> bool {
    let tags: Vec<&str> = ["038", "039"]
        .into_iter()
        .filter(|t| fields.contains(t))
        .collect();
    let old_sub: Vec<&Field> = old
        .fields()
        .filter(|f| tags.contains(&f.tag.as_str()))
        .collect();
    let new_sub: Vec<&Field> = new
        .fields()
        .filter(|f| tags.contains(&f.tag.as_str()))
        .collect();
    if old_sub.len() != new_sub.len() {
        return true;
    }
    old_sub
        .iter()
        .any(|of| !new_sub.iter().any(|nf| fields_match(of, nf)))
}

/// Order-independent field match used by the 038/039 rule.
///
/// An empty subfield value on either side matches anything.
fn fields_match(old: &Field, new: &Field) -> bool {
    if old.tag != new.tag || old.subfield_count() != new.subfield_count() {
        return false;
    }
    old.subfields()
        .filter(|sf| !IGNORABLE_SUBFIELDS.contains(&sf.name))
        .all(|osf| {
            new.subfields()
                .any(|nsf| nsf.name == osf.name && values_match(&osf.value, &nsf.value))
        })
}

fn values_match(old: &str, new: &str) -> bool {
    old.is_empty() || new.is_empty() || old == new
}

/// 100/110: the (name, compare form) pairs of the first field differ as
/// multisets over the given subfield names.
fn check_agent_field(old: &Record, new: &Record, tag: &str, names: &[char]) -> bool {
    normalized_pairs(old.first_field(tag), names) != normalized_pairs(new.first_field(tag), names)
}

fn normalized_pairs(field: Option<&Field>, names: &[char]) -> Vec<(char, String)> {
    let mut pairs: Vec<(char, String)> = field
        .map(|f| {
            f.subfields()
                .filter(|sf| names.contains(&sf.name))
                .map(|sf| (sf.name, strip(&sf.value)))
                .collect()
        })
        .unwrap_or_default();
    pairs.sort();
    pairs
}

/// 239 with the 245a title rule.
///
/// When only one side carries a 239, its 239t stands in for the other
/// side's 245a; a non-empty 239t that differs is immediately a change. When
/// both sides carry a 239 the field bodies are compared and a new 239t
/// suppresses the 245a rule. The 245a rule itself suppresses differences
/// explained by volume cataloguing: a section (004a `s`) with an unchanged
/// 245n, or a volume (004a `b`) with an unchanged 245g.
fn check_239_and_245(old: &Record, new: &Record) -> bool {
    const BODY: [char; 7] = ['a', 'h', 'k', 'e', 'f', 't', 'ø'];

    let old_239 = old.first_field("239");
    let new_239 = new.first_field("239");
    let mut check_239 = false;
    let mut check_245a = true;

    match (old_239, new_239) {
        (None, Some(n239)) => {
            let f245a = subfield_compare_string(old.first_field("245"), &['a'], NO_CUT);
            let f239t = subfield_compare_string(Some(n239), &['t'], NO_CUT);
            check_239 = f245a != f239t;
            if check_239 && !f239t.is_empty() {
                return true;
            }
            check_245a = check_239;
        }
        (Some(o239), None) => {
            let f245a = subfield_compare_string(new.first_field("245"), &['a'], NO_CUT);
            let f239t = subfield_compare_string(Some(o239), &['t'], NO_CUT);
            check_239 = f245a != f239t;
            if check_239 && !f239t.is_empty() {
                return true;
            }
            check_245a = check_239;
        }
        (Some(_), Some(n239)) => {
            check_239 = true;
            if n239.has_subfield('t') {
                check_245a = false;
            }
        }
        (None, None) => {}
    }

    if check_239
        && subfield_compare_string(old_239, &BODY, COMPARE_CUT)
            != subfield_compare_string(new_239, &BODY, COMPARE_CUT)
    {
        return true;
    }

    if check_245a {
        let old_a = subfield_compare_string(old.first_field("245"), &['a'], COMPARE_CUT);
        let new_a = subfield_compare_string(new.first_field("245"), &['a'], COMPARE_CUT);
        if old_a != new_a {
            let suppressed = match new.first_value("004", 'a') {
                Some("s") => {
                    subfield_compare_string(old.first_field("245"), &['n'], NO_CUT)
                        == subfield_compare_string(new.first_field("245"), &['n'], NO_CUT)
                }
                Some("b") => {
                    subfield_compare_string(old.first_field("245"), &['g'], NO_CUT)
                        == subfield_compare_string(new.first_field("245"), &['g'], NO_CUT)
                }
                _ => false,
            };
            if !suppressed {
                return true;
            }
        }
    }

    false
}

/// 245 subfields outside the title rule, each compared independently on the
/// first 245 field.
fn check_245(old: &Record, new: &Record) -> bool {
    let o = old.first_field("245");
    let n = new.first_field("245");

    if subfield_compare_string(o, &['g'], COMPARE_CUT) != subfield_compare_string(n, &['g'], COMPARE_CUT)
    {
        return true;
    }
    // media designations compare raw
    if subfield_raw_string(o, &['m']) != subfield_raw_string(n, &['m']) {
        return true;
    }
    if subfield_compare_string(o, &['n'], NO_CUT) != subfield_compare_string(n, &['n'], NO_CUT) {
        return true;
    }
    for name in ['o', 'y', 'æ', 'ø'] {
        if subfield_compare_string(o, &[name], COMPARE_CUT)
            != subfield_compare_string(n, &[name], COMPARE_CUT)
        {
            return true;
        }
    }
    false
}

/// 652: classification marks compared as sorted value lists across all 652
/// fields. Subject qualifiers (e, f, h) only count on fields that carry a
/// classification mark of their own (m or o).
fn check_652(old: &Record, new: &Record) -> bool {
    for name in ['a', 'b'] {
        if sorted_values(old, name, COMPARE_CUT) != sorted_values(new, name, COMPARE_CUT) {
            return true;
        }
    }
    for name in ['e', 'f', 'h'] {
        if sorted_gated_values(old, name) != sorted_gated_values(new, name) {
            return true;
        }
    }
    for name in ['m', 'o'] {
        if sorted_values(old, name, NO_CUT) != sorted_values(new, name, NO_CUT) {
            return true;
        }
    }
    false
}

fn sorted_values(record: &Record, name: char, cut: usize) -> Vec<String> {
    let mut values: Vec<String> = record
        .values("652", name)
        .map(|v| strip_cut(v, cut))
        .collect();
    values.sort();
    values
}

fn sorted_gated_values(record: &Record, name: char) -> Vec<String> {
    let mut values: Vec<String> = record
        .fields_by_tag("652")
        .filter(|f| f.has_subfield('m') || f.has_subfield('o'))
        .flat_map(|f| f.values(name))
        .map(strip)
        .collect();
    values.sort();
    values
}

/// Concatenated compare form of the named subfields, in field order.
fn subfield_compare_string(field: Option<&Field>, names: &[char], cut: usize) -> String {
    match field {
        None => String::new(),
        Some(f) => f
            .subfields()
            .filter(|sf| names.contains(&sf.name))
            .map(|sf| strip_cut(&sf.value, cut))
            .collect(),
    }
}

/// Concatenated raw values of the named subfields, in field order.
fn subfield_raw_string(field: Option<&Field>, names: &[char]) -> String {
    match field {
        None => String::new(),
        Some(f) => f
            .subfields()
            .filter(|sf| names.contains(&sf.name))
            .map(|sf| sf.value.as_str())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag_set::DEFAULT_CLASSIFICATION_FIELDS;

    fn record_with(fields: Vec<Field>) -> Record {
        Record { fields }
    }

    fn field(tag: &str, subfields: &[(char, &str)]) -> Field {
        let mut f = Field::new(tag, "00");
        for (name, value) in subfields {
            f.add_subfield(*name, *value);
        }
        f
    }

    #[test]
    fn test_has_classification_data() {
        let with = record_with(vec![field("245", &[('a', "Titel")])]);
        let without = record_with(vec![field("504", &[('a', "Note")])]);
        assert!(has_classification_data(&DEFAULT_CLASSIFICATION_FIELDS, &with));
        assert!(!has_classification_data(&DEFAULT_CLASSIFICATION_FIELDS, &without));
    }

    #[test]
    fn test_008_fires_one_direction_only() {
        let monograph = record_with(vec![field("008", &[('t', "m")])]);
        let periodical = record_with(vec![field("008", &[('t', "p")])]);

        assert!(check_008(&monograph, &periodical));
        assert!(!check_008(&periodical, &monograph));
        assert!(!check_008(&monograph, &monograph));
    }

    #[test]
    fn test_009_compares_first_values_raw() {
        let text = record_with(vec![field("009", &[('a', "a"), ('g', "xx")])]);
        let sound = record_with(vec![field("009", &[('a', "r"), ('g', "xx")])]);
        let no_g = record_with(vec![field("009", &[('a', "a")])]);

        assert!(check_009(&text, &sound));
        assert!(check_009(&text, &no_g));
        assert!(!check_009(&text, &text));
    }

    #[test]
    fn test_038_039_empty_value_is_wildcard() {
        let old = record_with(vec![field("038", &[('a', "")])]);
        let new = record_with(vec![field("038", &[('a', "te")])]);
        assert!(!check_038_039(&DEFAULT_CLASSIFICATION_FIELDS, &old, &new));

        let changed = record_with(vec![field("038", &[('a', "dr")])]);
        let other = record_with(vec![field("038", &[('a', "te")])]);
        assert!(check_038_039(&DEFAULT_CLASSIFICATION_FIELDS, &changed, &other));
    }

    #[test]
    fn test_038_039_count_mismatch_is_change() {
        let one = record_with(vec![field("038", &[('a', "te")])]);
        let two = record_with(vec![
            field("038", &[('a', "te")]),
            field("039", &[('a', "fol")]),
        ]);
        assert!(check_038_039(&DEFAULT_CLASSIFICATION_FIELDS, &one, &two));
    }

    #[test]
    fn test_100_ignores_subfield_order_and_diacritics() {
        let old = record_with(vec![field("100", &[('a', "Jansson"), ('h', "Tove")])]);
        let reordered = record_with(vec![field("100", &[('h', "Tové"), ('a', "Jansson")])]);
        let renamed = record_with(vec![field("100", &[('a', "Jansson"), ('h', "Lars")])]);

        assert!(!check_agent_field(&old, &reordered, "100", &['a', 'h', 'k', 'e', 'f']));
        assert!(check_agent_field(&old, &renamed, "100", &['a', 'h', 'k', 'e', 'f']));
    }

    #[test]
    fn test_239_t_stands_in_for_245a() {
        // new 239t repeats the old 245a, nothing else changes
        let old = record_with(vec![field("245", &[('a', "Sommerbogen")])]);
        let new = record_with(vec![
            field("239", &[('t', "Sommerbogen")]),
            field("245", &[('a', "Sommerbogen")]),
        ]);
        assert!(!check_239_and_245(&old, &new));

        // a differing non-empty 239t is a change
        let retitled = record_with(vec![
            field("239", &[('t', "Vinterbogen")]),
            field("245", &[('a', "Sommerbogen")]),
        ]);
        assert!(check_239_and_245(&old, &retitled));
    }

    #[test]
    fn test_245a_change_detected() {
        let old = record_with(vec![field("245", &[('a', "Sommerbogen")])]);
        let new = record_with(vec![field("245", &[('a', "Vinterbogen")])]);
        assert!(check_239_and_245(&old, &new));
    }

    #[test]
    fn test_245a_section_suppression_via_245n() {
        let old = record_with(vec![
            field("004", &[('a', "s")]),
            field("245", &[('a', "Bind et"), ('n', "1")]),
        ]);
        let new = record_with(vec![
            field("004", &[('a', "s")]),
            field("245", &[('a', "Et helt andet bind"), ('n', "1")]),
        ]);
        assert!(!check_239_and_245(&old, &new));

        let other_section = record_with(vec![
            field("004", &[('a', "s")]),
            field("245", &[('a', "Et helt andet bind"), ('n', "2")]),
        ]);
        assert!(check_239_and_245(&old, &other_section));
    }

    #[test]
    fn test_245_media_designation_compares_raw() {
        let old = record_with(vec![field("245", &[('m', "Dvd")])]);
        let new = record_with(vec![field("245", &[('m', "dvd")])]);
        assert!(check_245(&old, &new));
        assert!(!check_245(&old, &old));
    }

    #[test]
    fn test_652_marks_compare_sorted() {
        let old = record_with(vec![
            field("652", &[('m', "99.4"), ('a', "Jansson")]),
            field("652", &[('o', "sk")]),
        ]);
        let reordered = record_with(vec![
            field("652", &[('o', "sk")]),
            field("652", &[('m', "99.4"), ('a', "Jansson")]),
        ]);
        let changed = record_with(vec![
            field("652", &[('m', "99.7"), ('a', "Jansson")]),
            field("652", &[('o', "sk")]),
        ]);

        assert!(!check_652(&old, &reordered));
        assert!(check_652(&old, &changed));
    }

    #[test]
    fn test_652_qualifiers_only_count_with_marks() {
        // e without m/o on its field is invisible to the rule
        let old = record_with(vec![field("652", &[('e', "1. udgave")])]);
        let new = record_with(vec![field("652", &[('e', "2. udgave")])]);
        assert!(!check_652(&old, &new));

        let old_marked = record_with(vec![field("652", &[('m', "99.4"), ('e', "1. udgave")])]);
        let new_marked = record_with(vec![field("652", &[('m', "99.4"), ('e', "2. udgave")])]);
        assert!(check_652(&old_marked, &new_marked));
    }

    #[test]
    fn test_update_copies_only_into_bare_target() {
        let common = record_with(vec![
            field("245", &[('a', "Titel")]),
            field("652", &[('m', "99.4")]),
            field("504", &[('a', "Note")]),
        ]);
        let bare = record_with(vec![field("001", &[('a', "x"), ('b', "714700")])]);

        let updated = update_classifications_in_record(&DEFAULT_CLASSIFICATION_FIELDS, &common, &bare);
        assert!(updated.has_field("245"));
        assert!(updated.has_field("652"));
        assert!(!updated.has_field("504"));

        let again = update_classifications_in_record(&DEFAULT_CLASSIFICATION_FIELDS, &common, &updated);
        assert_eq!(again.field_count("245"), 1);
    }

    #[test]
    fn test_remove_classifications_is_idempotent() {
        let record = record_with(vec![
            field("001", &[('a', "x"), ('b', "714700")]),
            field("245", &[('a', "Titel")]),
            field("504", &[('a', "Note")]),
        ]);
        let removed = remove_classifications_from_record(&DEFAULT_CLASSIFICATION_FIELDS, &record);
        assert!(!removed.has_field("245"));
        assert!(removed.has_field("504"));
        assert_eq!(
            remove_classifications_from_record(&DEFAULT_CLASSIFICATION_FIELDS, &removed),
            removed
        );
    }
}
