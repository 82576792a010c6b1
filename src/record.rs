//! danMARC2 record structures and operations.
//!
//! This module provides the core record types used by the update rules:
//! - [`Record`] — An ordered sequence of fields
//! - [`Field`] — A tagged field with a two-character indicator and subfields
//! - [`Subfield`] — A named data element within a field
//!
//! Unlike binary MARC, danMARC2 exchange records carry repeatable tags whose
//! order is significant, so fields are stored as a flat ordered list rather
//! than a tag-keyed map.
//!
//! # Examples
//!
//! Create a record with the builder API:
//!
//! ```ignore
//! use opencat_rules::{Field, Record};
//!
//! let record = Record::builder()
//!     .field(
//!         Field::builder("001", "00")
//!             .subfield('a', "2 345 678 9")
//!             .subfield('b', "870970")
//!             .build(),
//!     )
//!     .field(
//!         Field::builder("245", "00")
//!             .subfield('a', "Troldmandens hat")
//!             .build(),
//!     )
//!     .build();
//! ```
//!
//! Iterate over fields:
//!
//! ```ignore
//! for field in record.fields_by_tag("666") {
//!     for value in field.values('f') {
//!         println!("Subject: {value}");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::record_value_accessors;

/// Subfield names that mark provenance rather than content.
///
/// These are skipped when record content is compared: `&` carries the owning
/// agency of an extension field, `0`, `1` and `4` carry linking markers.
pub const IGNORABLE_SUBFIELDS: [char; 4] = ['&', '0', '1', '4'];

/// A danMARC2 record: an ordered sequence of fields.
///
/// Fields are stored in insertion order and tags may repeat. Record identity
/// is carried in field 001 (`a` = record id, `b` = agency id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The fields of the record, in order.
    pub fields: Vec<Field>,
}

/// A field in a danMARC2 record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 characters, e.g. `"001"`, `"245"`, `"z98"`).
    #[serde(rename = "name")]
    pub tag: String,
    /// Two-character indicator, `"00"` for most danMARC2 fields.
    pub indicator: String,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields
    /// with 4 or fewer subfields).
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield name (single character).
    pub name: char,
    /// Subfield value.
    pub value: String,
}

impl Subfield {
    /// Create a new subfield.
    #[must_use]
    pub fn new(name: char, value: impl Into<String>) -> Self {
        Subfield {
            name,
            value: value.into(),
        }
    }
}

impl Record {
    /// Create a new empty record.
    #[must_use]
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Create a builder for fluently constructing records.
    ///
    /// # Examples
    ///
    /// ```
    /// use opencat_rules::{Field, Record};
    ///
    /// let record = Record::builder()
    ///     .field(
    ///         Field::builder("001", "00")
    ///             .subfield('a', "2 345 678 9")
    ///             .subfield('b', "870970")
    ///             .build(),
    ///     )
    ///     .build();
    ///
    /// assert_eq!(record.record_id(), Some("2 345 678 9"));
    /// ```
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder {
            record: Record::new(),
        }
    }

    /// Append a field to the record.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Insert a field at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_field(&mut self, index: usize, field: Field) {
        self.fields.insert(index, field);
    }

    /// Remove all fields with a given tag.
    ///
    /// Returns the removed fields.
    pub fn remove_fields(&mut self, tag: &str) -> Vec<Field> {
        let mut removed = Vec::new();
        self.fields.retain(|f| {
            if f.tag == tag {
                removed.push(f.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Iterate over all fields in record order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate mutably over all fields.
    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    /// Iterate over fields matching a specific tag.
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    /// Get the first field with a given tag.
    #[must_use]
    pub fn first_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Check whether the record has at least one field with the given tag.
    #[must_use]
    pub fn has_field(&self, tag: &str) -> bool {
        self.first_field(tag).is_some()
    }

    /// Count the fields with a given tag.
    #[must_use]
    pub fn field_count(&self, tag: &str) -> usize {
        self.fields_by_tag(tag).count()
    }

    /// Get the first value of a named subfield in the first field with the
    /// given tag.
    #[must_use]
    pub fn first_value(&self, tag: &str, name: char) -> Option<&str> {
        self.first_field(tag).and_then(|f| f.first_value(name))
    }

    /// Iterate over every value of a named subfield across all fields with
    /// the given tag, in record order.
    pub fn values<'a>(&'a self, tag: &'a str, name: char) -> impl Iterator<Item = &'a str> + 'a {
        self.fields_by_tag(tag).flat_map(move |f| f.values(name))
    }

    /// Set the first occurrence of a named subfield in the first field with
    /// the given tag, replacing an existing value or appending the subfield.
    ///
    /// When the record has no field with the tag, one is appended with
    /// indicator `"00"`.
    pub fn set_first_value(&mut self, tag: &str, name: char, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.tag == tag) {
            field.set_subfield(name, value);
        } else {
            let mut field = Field::new(tag, "00");
            field.add_subfield(name, value);
            self.fields.push(field);
        }
    }

    record_value_accessors! {
        /// The record identifier, from subfield 001a.
        record_id => ("001", 'a'),
        /// The owning agency identifier, from subfield 001b.
        agency_id => ("001", 'b'),
        /// The cataloguing owner, from subfield 996a.
        owner => ("996", 'a'),
    }

    /// The number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for fluently constructing records.
///
/// # Examples
///
/// ```ignore
/// use opencat_rules::{Field, Record};
///
/// let record = Record::builder()
///     .field(Field::builder("004", "00").subfield('a', "e").build())
///     .field(Field::builder("008", "00").subfield('t', "m").build())
///     .build();
/// ```
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Add a field to the record being built.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the record.
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl Field {
    /// Create a new field with no subfields.
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator: impl Into<String>) -> Self {
        Field {
            tag: tag.into(),
            indicator: indicator.into(),
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for constructing fields fluently.
    ///
    /// # Examples
    ///
    /// ```
    /// use opencat_rules::Field;
    ///
    /// let field = Field::builder("245", "00")
    ///     .subfield('a', "Troldmandens hat")
    ///     .subfield('e', "Tove Jansson")
    ///     .build();
    ///
    /// assert_eq!(field.first_value('a'), Some("Troldmandens hat"));
    /// ```
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator),
        }
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, name: char, value: impl Into<String>) {
        self.subfields.push(Subfield::new(name, value));
    }

    /// Insert a subfield at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_subfield(&mut self, index: usize, name: char, value: impl Into<String>) {
        self.subfields.insert(index, Subfield::new(name, value));
    }

    /// Replace the value of the first subfield with the given name, or append
    /// the subfield when the field has no such subfield.
    pub fn set_subfield(&mut self, name: char, value: impl Into<String>) {
        if let Some(sf) = self.subfields.iter_mut().find(|sf| sf.name == name) {
            sf.value = value.into();
        } else {
            self.add_subfield(name, value);
        }
    }

    /// Remove all subfields with a given name.
    ///
    /// Returns the removed subfields.
    pub fn remove_subfields(&mut self, name: char) -> Vec<Subfield> {
        let mut removed = Vec::new();
        self.subfields.retain(|sf| {
            if sf.name == name {
                removed.push(sf.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Get the first value for a subfield name.
    #[must_use]
    pub fn first_value(&self, name: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.name == name)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over all values with a specific subfield name, in field order.
    pub fn values(&self, name: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.name == name)
            .map(|sf| sf.value.as_str())
    }

    /// Check whether the field has a subfield with the given name.
    #[must_use]
    pub fn has_subfield(&self, name: char) -> bool {
        self.subfields.iter().any(|sf| sf.name == name)
    }

    /// Iterate over all subfields in order.
    pub fn subfields(&self) -> impl Iterator<Item = &Subfield> {
        self.subfields.iter()
    }

    /// The number of subfields in the field.
    #[must_use]
    pub fn subfield_count(&self) -> usize {
        self.subfields.len()
    }

    /// A copy of the field without the subfields named in `names`.
    ///
    /// Used for content comparison with [`IGNORABLE_SUBFIELDS`] stripped.
    #[must_use]
    pub fn without_subfields(&self, names: &[char]) -> Field {
        Field {
            tag: self.tag.clone(),
            indicator: self.indicator.clone(),
            subfields: self
                .subfields
                .iter()
                .filter(|sf| !names.contains(&sf.name))
                .cloned()
                .collect(),
        }
    }

    /// Compare two fields ignoring subfield order.
    ///
    /// Fields are equal when tag, indicator and subfield count match and the
    /// subfields, sorted by (name, value), are pairwise equal.
    #[must_use]
    pub fn eq_ignoring_subfield_order(&self, other: &Field) -> bool {
        if self.tag != other.tag
            || self.indicator != other.indicator
            || self.subfields.len() != other.subfields.len()
        {
            return false;
        }
        let mut left: Vec<(char, &str)> = self
            .subfields
            .iter()
            .map(|sf| (sf.name, sf.value.as_str()))
            .collect();
        let mut right: Vec<(char, &str)> = other
            .subfields
            .iter()
            .map(|sf| (sf.name, sf.value.as_str()))
            .collect();
        left.sort_unstable();
        right.sort_unstable();
        left == right
    }
}

/// Builder for fluently constructing fields.
///
/// # Examples
///
/// ```ignore
/// use opencat_rules::Field;
///
/// let field = Field::builder("996", "00")
///     .subfield('a', "714700")
///     .build();
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield to the field being built.
    #[must_use]
    pub fn subfield(mut self, name: char, value: impl Into<String>) -> Self {
        self.field.add_subfield(name, value);
        self
    }

    /// Build the field.
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}
