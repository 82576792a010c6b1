//! Authorization dispatch for record updates.
//!
//! Every update is judged by the authenticator claiming the submitting
//! group: DBC agencies first, then the FBS libraries. A group holding the
//! root feature skips authorization entirely as long as it leaves record
//! ownership alone. When no authenticator claims the group the update is
//! rejected with a generic message.
//!
//! # Examples
//!
//! ```ignore
//! use opencat_rules::authenticator::RecordAuthenticator;
//! use opencat_rules::EXTENTABLE_NOTE_FIELDS;
//!
//! let authenticator = RecordAuthenticator::new(&repo, &features, &EXTENTABLE_NOTE_FIELDS);
//! let messages = authenticator.authenticate_record(&record, "netpunkt", "714700")?;
//! if messages.is_empty() {
//!     let records = authenticator.record_data_for_raw_repo(&record, "netpunkt", "714700")?;
//! }
//! ```

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::agency::AUTH_ROOT_FEATURE;
use crate::dbc_authenticator::DbcAuthenticator;
use crate::error::Result;
use crate::fbs_authenticator::FbsAuthenticator;
use crate::messages::ValidationMessage;
use crate::record::{Field, Record};
use crate::repository::RawRepo;
use crate::tag_set::TagSet;

/// Authorization policy for one class of agencies.
pub trait Authenticator {
    /// Check whether this authenticator handles requests from the group.
    fn can_authenticate(&self, group_id: &str) -> bool;

    /// Validate that the user and group may store the record.
    ///
    /// An empty message list means the update is approved.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    fn authenticate_record(
        &self,
        record: &Record,
        user_id: &str,
        group_id: &str,
    ) -> Result<Vec<ValidationMessage>>;

    /// The records to store for an approved update, in storage order.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    fn record_data_for_raw_repo(
        &self,
        record: &Record,
        user_id: &str,
        group_id: &str,
    ) -> Result<Vec<Record>>;
}

/// Lookup of optional per-agency features.
pub trait AgencyFeatures {
    /// Check whether an agency holds a named feature.
    ///
    /// # Errors
    ///
    /// Returns an error when the feature backend cannot be reached.
    fn has_feature(&self, agency_id: &str, feature: &str) -> Result<bool>;
}

/// In-memory [`AgencyFeatures`] backend.
///
/// Doubles as the test fake and as a convenience for embedders with a
/// static feature configuration.
#[derive(Debug, Default)]
pub struct MemoryFeatures {
    features: BTreeSet<(String, String)>,
}

impl MemoryFeatures {
    /// Create an empty feature set.
    #[must_use]
    pub fn new() -> Self {
        MemoryFeatures::default()
    }

    /// Grant a feature to an agency.
    pub fn grant(&mut self, agency_id: impl Into<String>, feature: impl Into<String>) {
        self.features.insert((agency_id.into(), feature.into()));
    }
}

impl AgencyFeatures for MemoryFeatures {
    fn has_feature(&self, agency_id: &str, feature: &str) -> Result<bool> {
        Ok(self
            .features
            .contains(&(agency_id.to_string(), feature.to_string())))
    }
}

/// Dispatching authenticator over the known agency classes.
#[derive(Debug)]
pub struct RecordAuthenticator<'a, R, F> {
    repo: &'a R,
    features: &'a F,
    dbc: DbcAuthenticator<'a, R>,
    fbs: FbsAuthenticator<'a, R>,
}

impl<'a, R: RawRepo, F: AgencyFeatures> RecordAuthenticator<'a, R, F> {
    /// Create a dispatcher over a repository, a feature backend and the set
    /// of extensible note/subject fields.
    pub fn new(repo: &'a R, features: &'a F, extensible_fields: &'a TagSet) -> Self {
        RecordAuthenticator {
            repo,
            features,
            dbc: DbcAuthenticator::new(repo),
            fbs: FbsAuthenticator::new(repo, extensible_fields),
        }
    }

    fn authenticators(&self) -> [&dyn Authenticator; 2] {
        [&self.dbc, &self.fbs]
    }

    /// Validate that the user and group may store the record.
    ///
    /// # Errors
    ///
    /// Propagates repository and feature backend failures.
    pub fn authenticate_record(
        &self,
        record: &Record,
        user_id: &str,
        group_id: &str,
    ) -> Result<Vec<ValidationMessage>> {
        if self.root_access_applies(record, group_id)? {
            debug!(group_id, "root feature grants access");
            return Ok(Vec::new());
        }
        for authenticator in self.authenticators() {
            if authenticator.can_authenticate(group_id) {
                return authenticator.authenticate_record(record, user_id, group_id);
            }
        }
        warn!(group_id, "no authenticator claims this group");
        Ok(vec![ValidationMessage::record_error(
            "Der eksistere ikke en authenticator for denne post eller bruger.",
        )])
    }

    /// The records to store for an approved update, in storage order.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn record_data_for_raw_repo(
        &self,
        record: &Record,
        user_id: &str,
        group_id: &str,
    ) -> Result<Vec<Record>> {
        for authenticator in self.authenticators() {
            if authenticator.can_authenticate(group_id) {
                return authenticator.record_data_for_raw_repo(record, user_id, group_id);
            }
        }
        debug!(group_id, "no authenticator claims this group, storing record as-is");
        Ok(vec![record.clone()])
    }

    /// Root holders skip authorization for new records and for updates that
    /// leave the 996 ownership fields untouched.
    fn root_access_applies(&self, record: &Record, group_id: &str) -> Result<bool> {
        if !self.features.has_feature(group_id, AUTH_ROOT_FEATURE)? {
            return Ok(false);
        }
        let record_id = record.record_id().unwrap_or("");
        let agency_id = record.agency_id().unwrap_or("");
        match self.repo.fetch_record(record_id, agency_id)? {
            Some(stored) => Ok(ownership_fields_unchanged(record, &stored)),
            None => Ok(true),
        }
    }
}

fn ownership_fields_unchanged(record: &Record, stored: &Record) -> bool {
    let new_996: Vec<&Field> = record.fields_by_tag("996").collect();
    let stored_996: Vec<&Field> = stored.fields_by_tag("996").collect();
    new_996.len() == stored_996.len()
        && new_996
            .iter()
            .all(|nf| stored_996.iter().any(|sf| sf.eq_ignoring_subfield_order(nf)))
}
