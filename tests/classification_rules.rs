//! Classification change detection across full records.

mod common;

use common::{create_common_record, create_field, create_record};
use opencat_rules::classification::{
    has_classification_data, has_classifications_changed, remove_classifications_from_record,
    update_classifications_in_record,
};
use opencat_rules::{Field, Record, DEFAULT_CLASSIFICATION_FIELDS};
use proptest::prelude::*;

fn changed(old: &Record, new: &Record) -> bool {
    has_classifications_changed(&DEFAULT_CLASSIFICATION_FIELDS, old, new)
}

#[test]
fn test_identical_records_are_unchanged() {
    let record = create_common_record("20611529");
    assert!(!changed(&record, &record));
}

#[test]
fn test_monograph_to_periodical_fires_one_way() {
    let monograph = create_common_record("20611529");
    let mut periodical = create_common_record("20611529");
    periodical.set_first_value("008", 't', "p");

    assert!(changed(&monograph, &periodical));
    assert!(!changed(&periodical, &monograph));
}

#[test]
fn test_material_code_change_fires() {
    let text = create_common_record("20611529");
    let mut sound = create_common_record("20611529");
    sound.set_first_value("009", 'a', "r");

    assert!(changed(&text, &sound));
}

#[test]
fn test_reordered_sub_records_are_unchanged() {
    let mut old = create_common_record("20611529");
    old.add_field(create_field("038", &[('a', "dr")]));
    old.add_field(create_field("039", &[('a', "fol"), ('b', "dk")]));

    let mut new = create_common_record("20611529");
    new.add_field(create_field("039", &[('b', "dk"), ('a', "fol")]));
    new.add_field(create_field("038", &[('a', "dr")]));

    assert!(!changed(&old, &new));
}

#[test]
fn test_author_diacritics_and_case_are_unchanged() {
    let mut old = create_common_record("20611529");
    old.add_field(create_field("100", &[('a', "Sørensen"), ('h', "Åge")]));
    let mut new = create_common_record("20611529");
    new.add_field(create_field("100", &[('h', "ÅGE"), ('a', "SØRENSEN")]));

    // subfield order, case and the decomposed ring above Å all normalize away
    assert!(!changed(&old, &new));

    let mut renamed = create_common_record("20611529");
    renamed.add_field(create_field("100", &[('a', "Sørensen"), ('h', "Øge")]));
    assert!(changed(&old, &renamed));
}

#[test]
fn test_title_change_beyond_cut_is_unchanged() {
    let old = create_common_record("20611529");
    let mut new = create_common_record("20611529");
    // the compare depth is ten characters past normalization
    new.set_first_value("245", 'a', "Mit liv som Bente");

    // "mitlivsomb" == "mitlivsomb"
    assert!(!changed(&old, &new));

    let mut retitled = create_common_record("20611529");
    retitled.set_first_value("245", 'a', "Dit liv som Bent");
    assert!(changed(&old, &retitled));
}

#[test]
fn test_volume_title_variation_is_suppressed() {
    let old = create_record(&[
        ("004", &[('a', "b")]),
        ("245", &[('a', "Første bind"), ('g', "1")]),
    ]);
    let new = create_record(&[
        ("004", &[('a', "b")]),
        ("245", &[('a', "Andet bind"), ('g', "1")]),
    ]);
    assert!(!changed(&old, &new));

    let other_volume = create_record(&[
        ("004", &[('a', "b")]),
        ("245", &[('a', "Andet bind"), ('g', "2")]),
    ]);
    assert!(changed(&old, &other_volume));
}

#[test]
fn test_subject_qualifier_needs_mark_on_its_field() {
    let mut old = create_common_record("20611529");
    old.add_field(create_field("652", &[('e', "København")]));
    let mut new = create_common_record("20611529");
    new.add_field(create_field("652", &[('e', "Aarhus")]));

    // the qualifier sits on a field without m/o and stays invisible
    assert!(!changed(&old, &new));
}

fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("001".to_string()),
        Just("004".to_string()),
        Just("008".to_string()),
        Just("009".to_string()),
        Just("100".to_string()),
        Just("245".to_string()),
        Just("504".to_string()),
        Just("652".to_string()),
        Just("666".to_string()),
    ]
}

fn arb_subfield() -> impl Strategy<Value = (char, String)> {
    (
        prop_oneof![Just('a'), Just('b'), Just('g'), Just('m'), Just('t')],
        "[a-zæøå0-9 ]{0,12}",
    )
}

fn arb_record() -> impl Strategy<Value = Record> {
    proptest::collection::vec(
        (arb_tag(), proptest::collection::vec(arb_subfield(), 0..4)),
        0..8,
    )
    .prop_map(|rows| {
        let mut record = Record::new();
        for (tag, subfields) in rows {
            let mut field = Field::new(tag, "00");
            for (name, value) in subfields {
                field.add_subfield(name, value);
            }
            record.add_field(field);
        }
        record
    })
}

proptest! {
    #[test]
    fn prop_data_presence_matches_tag_membership(record in arb_record()) {
        let expected = record
            .fields()
            .any(|f| DEFAULT_CLASSIFICATION_FIELDS.contains(&f.tag));
        prop_assert_eq!(
            has_classification_data(&DEFAULT_CLASSIFICATION_FIELDS, &record),
            expected
        );
    }

    #[test]
    fn prop_record_never_differs_from_itself(record in arb_record()) {
        prop_assert!(!has_classifications_changed(
            &DEFAULT_CLASSIFICATION_FIELDS,
            &record,
            &record
        ));
    }

    #[test]
    fn prop_removal_is_idempotent(record in arb_record()) {
        let once = remove_classifications_from_record(&DEFAULT_CLASSIFICATION_FIELDS, &record);
        let twice = remove_classifications_from_record(&DEFAULT_CLASSIFICATION_FIELDS, &once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_update_copies_at_most_once(common in arb_record(), target in arb_record()) {
        let updated =
            update_classifications_in_record(&DEFAULT_CLASSIFICATION_FIELDS, &common, &target);
        let again =
            update_classifications_in_record(&DEFAULT_CLASSIFICATION_FIELDS, &common, &updated);
        prop_assert_eq!(again, updated);
    }
}
