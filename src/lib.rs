#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # opencat-rules: authorization and enrichment rules for danMARC2
//!
//! A rules engine for a danMARC2 record exchange platform: it decides who
//! may store which bibliographic records, and how library enrichment
//! records follow the shared records they overlay.
//!
//! ## Quick Start
//!
//! ### Authorizing an update
//!
//! ```ignore
//! use opencat_rules::{MemoryFeatures, MemoryRepo, RecordAuthenticator};
//! use opencat_rules::EXTENTABLE_NOTE_FIELDS;
//!
//! let repo = MemoryRepo::new();
//! let features = MemoryFeatures::new();
//! let authenticator = RecordAuthenticator::new(&repo, &features, &EXTENTABLE_NOTE_FIELDS);
//!
//! let messages = authenticator.authenticate_record(&record, user_id, group_id)?;
//! if messages.is_empty() {
//!     for record in authenticator.record_data_for_raw_repo(&record, user_id, group_id)? {
//!         // hand each record to the repository
//!     }
//! }
//! ```
//!
//! ### Following classification changes
//!
//! ```ignore
//! use opencat_rules::{classification, enrichment};
//! use opencat_rules::DEFAULT_CLASSIFICATION_FIELDS;
//!
//! if classification::has_classifications_changed(&DEFAULT_CLASSIFICATION_FIELDS, &old, &new) {
//!     let corrected = enrichment::update_record(&DEFAULT_CLASSIFICATION_FIELDS, &old, &new, &overlay);
//!     if corrected.is_empty() {
//!         // the overlay no longer contributes anything
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`record`] — Core record structures (`Record`, `Field`, `Subfield`)
//! - [`tag_set`] — Field tag sets and the compiled rule configurations
//! - [`agency`] — Agency id constants and membership classification
//! - [`normalize`] — Comparison normalization for subfield values
//! - [`classification`] — Classification change rules
//! - [`material_codes`] — 009 material code table with recursive resolution
//! - [`enrichment`] — Enrichment record synchronization
//! - [`authenticator`] — Authorization dispatch and the root bypass
//! - [`dbc_authenticator`] — Policy for DBC agencies
//! - [`fbs_authenticator`] — Policy for FBS libraries
//! - [`extensions`] — Note/subject extensions on national common records
//! - [`ownership`] — Ownership history merging for field 996
//! - [`repository`] — The `RawRepo` lookup trait and an in-memory backend
//! - [`sort`] — Tag-ordered field insertion and subfield ordering
//! - [`messages`] — Validation messages in the platform wire shape
//! - [`json`] — Record wire (de)serialization
//! - [`error`] — Error types and result type

pub mod agency;
pub mod authenticator;
pub mod classification;
pub mod dbc_authenticator;
pub mod enrichment;
pub mod error;
pub mod extensions;
pub mod fbs_authenticator;
pub mod json;
pub mod macros;
pub mod material_codes;
pub mod messages;
pub mod normalize;
pub mod ownership;
pub mod record;
pub mod repository;
pub mod sort;
pub mod tag_set;

pub use agency::{
    is_dbc_agency, is_fbs_agency, AUTH_ROOT_FEATURE, COMMON_AGENCY_ID, DBC_LOGIN_AGENCY_ID,
    RAWREPO_COMMON_AGENCY_ID, RAWREPO_DBC_ENRICHMENT_AGENCY_ID,
};
pub use authenticator::{AgencyFeatures, Authenticator, MemoryFeatures, RecordAuthenticator};
pub use dbc_authenticator::DbcAuthenticator;
pub use error::{Result, UpdateError};
pub use extensions::{is_national_common_record, ExtensionsHandler};
pub use fbs_authenticator::FbsAuthenticator;
pub use messages::{MessageParams, MessageType, ValidationMessage};
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield, IGNORABLE_SUBFIELDS};
pub use repository::{MemoryRepo, RawRepo};
pub use tag_set::{
    TagSet, DEFAULT_CLASSIFICATION_FIELDS, EXTENTABLE_NOTE_FIELDS, RECORD_CONTROL_FIELDS,
    REFERENCE_FIELDS, SINGLE_VOLUME_CLASSIFICATION_FIELDS,
};
