//! Common test helpers and fixture records shared across the test suite.

use opencat_rules::{Field, Record};

/// Creates a field with indicator "00" and the given subfields.
pub fn create_field(tag: &str, subfields: &[(char, &str)]) -> Field {
    let mut field = Field::new(tag, "00");
    for (name, value) in subfields {
        field.add_subfield(*name, *value);
    }
    field
}

/// Creates a record from rows of (tag, subfields).
pub fn create_record(rows: &[(&str, &[(char, &str)])]) -> Record {
    let mut record = Record::new();
    for (tag, subfields) in rows {
        record.add_field(create_field(tag, subfields));
    }
    record
}

/// Creates a shared common record as the national cataloguing flow delivers
/// it: identity, material data, classification fields and DBC ownership.
#[allow(dead_code)]
pub fn create_common_record(record_id: &str) -> Record {
    create_record(&[
        ("001", &[('a', record_id), ('b', "870970")]),
        ("004", &[('a', "e"), ('r', "n")]),
        ("008", &[('t', "m"), ('v', "0")]),
        ("009", &[('a', "a"), ('g', "xx")]),
        ("245", &[('a', "Mit liv som Bent")]),
        ("652", &[('m', "99.4"), ('a', "Nielsen"), ('h', "Bent")]),
        ("996", &[('a', "DBC")]),
    ])
}

/// Creates a library enrichment overlay carrying only identity and a local
/// note.
#[allow(dead_code)]
pub fn create_enrichment_record(record_id: &str, agency_id: &str) -> Record {
    create_record(&[
        ("001", &[('a', record_id), ('b', agency_id)]),
        ("s12", &[('a', "Lokal bemærkning")]),
    ])
}

/// Creates a national common record under the repository common agency,
/// open for note/subject extension.
#[allow(dead_code)]
pub fn create_national_common_record(record_id: &str) -> Record {
    create_record(&[
        ("001", &[('a', record_id), ('b', "191919")]),
        ("004", &[('a', "e"), ('r', "n")]),
        ("032", &[('a', "DBF202634"), ('x', "ACC202630")]),
        ("245", &[('a', "Mit liv som Bent")]),
        ("300", &[('a', "178 sider")]),
        ("996", &[('a', "DBC")]),
    ])
}
