//! Explicit tag sets for field classification.
//!
//! The upstream configuration expresses field groups as `|`-separated tag
//! alternations such as `"004|008|009|038|039|100|110|239|245|652"`. This
//! module parses those specifications into an explicit [`TagSet`] once, up
//! front, so rule evaluation never re-interprets the configuration and a
//! malformed specification surfaces as an error before any record is touched.

use std::collections::BTreeSet;
use std::fmt;

use lazy_static::lazy_static;

use crate::error::{Result, UpdateError};

/// An explicit set of three-character field tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    /// Parse a `|`-separated tag alternation into a tag set.
    ///
    /// Each alternative must be exactly three ASCII alphanumeric characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use opencat_rules::TagSet;
    ///
    /// let set = TagSet::parse("001|004|996").unwrap();
    /// assert!(set.contains("004"));
    /// assert!(!set.contains("008"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::InvalidTagSet`] when the specification is empty
    /// or any alternative is not a well-formed tag.
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(UpdateError::InvalidTagSet("empty specification".to_string()));
        }
        let mut tags = BTreeSet::new();
        for part in spec.split('|') {
            if part.len() != 3 || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(UpdateError::InvalidTagSet(format!(
                    "'{part}' in '{spec}' is not a three-character tag"
                )));
            }
            tags.insert(part.to_string());
        }
        Ok(TagSet { tags })
    }

    /// Build a tag set from known-good tags without validation.
    #[must_use]
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagSet {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a tag is in the set.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Iterate over the tags in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// The union of this set and another.
    #[must_use]
    pub fn union(&self, other: &TagSet) -> TagSet {
        TagSet {
            tags: self.tags.union(&other.tags).cloned().collect(),
        }
    }

    /// The number of tags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec: Vec<&str> = self.iter().collect();
        write!(f, "{}", spec.join("|"))
    }
}

lazy_static! {
    /// Fields carrying classification data on ordinary records.
    pub static ref DEFAULT_CLASSIFICATION_FIELDS: TagSet = TagSet::from_tags([
        "004", "008", "009", "038", "039", "100", "110", "239", "245", "652",
    ]);

    /// Fields carrying classification data on single volumes, where 008 is
    /// inherited from the head record.
    pub static ref SINGLE_VOLUME_CLASSIFICATION_FIELDS: TagSet = TagSet::from_tags([
        "004", "009", "038", "039", "100", "110", "239", "245", "652",
    ]);

    /// Note and subject fields a non-owning library may extend on a national
    /// common record.
    pub static ref EXTENTABLE_NOTE_FIELDS: TagSet = TagSet::from_tags([
        "504", "530", "531", "600", "610", "631", "666", "770", "780", "795",
    ]);

    /// Control fields always kept on an enrichment record.
    pub static ref RECORD_CONTROL_FIELDS: TagSet = TagSet::from_tags(["001", "004", "996"]);

    /// Reference fields whose subfield z points at another field by tag.
    pub static ref REFERENCE_FIELDS: TagSet = TagSet::from_tags(["900", "910", "945"]);
}
