//! Macros for code generation in record types.
//!
//! This module provides macros to reduce boilerplate in record accessors,
//! particularly for the well-known (tag, subfield) value lookups.

/// Macro to generate first-value accessor methods for (tag, subfield) pairs.
///
/// This macro is designed to be used inside an impl block of a type exposing
/// `first_value(&self, tag: &str, name: char) -> Option<&str>` and generates
/// one `#[must_use]` getter per entry.
///
/// # Example
///
/// ```ignore
/// impl MyRecord {
///     record_value_accessors! {
///         /// The record identifier, from subfield 001a.
///         record_id => ("001", 'a'),
///         /// The owning agency identifier, from subfield 001b.
///         agency_id => ("001", 'b'),
///     }
/// }
/// ```
#[macro_export]
macro_rules! record_value_accessors {
    ($($(#[$meta:meta])* $method:ident => ($tag:expr, $name:expr)),* $(,)?) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $method(&self) -> Option<&str> {
                self.first_value($tag, $name)
            }
        )*
    };
}
