//! Authorization policy for FBS libraries.
//!
//! A library may always edit its own local records. Common records are
//! guarded by ownership: creation requires claiming ownership, updates
//! require that the stored record is held by a library (or released with
//! the `RET` marker) and that the submitter claims ownership, and edits to
//! national common records are narrowed to the extensible note/subject
//! fields. When a library stores a common record, the DBC enrichment
//! companion carrying the s10 ownership mirror is maintained alongside it.

use tracing::debug;

use crate::agency::{
    is_fbs_agency, COMMON_AGENCY_ID, RAWREPO_COMMON_AGENCY_ID, RAWREPO_DBC_ENRICHMENT_AGENCY_ID,
};
use crate::authenticator::Authenticator;
use crate::error::Result;
use crate::extensions::ExtensionsHandler;
use crate::messages::ValidationMessage;
use crate::ownership::RELEASED_OWNER;
use crate::record::{Field, Record};
use crate::repository::RawRepo;
use crate::sort::insert_field_sorted;
use crate::tag_set::TagSet;

/// Authorization policy for records submitted by FBS libraries.
#[derive(Debug)]
pub struct FbsAuthenticator<'a, R> {
    repo: &'a R,
    extensions: ExtensionsHandler<'a, R>,
}

impl<'a, R: RawRepo> FbsAuthenticator<'a, R> {
    /// Create the policy over a repository and the set of extensible
    /// note/subject fields.
    pub fn new(repo: &'a R, extensible_fields: &'a TagSet) -> Self {
        FbsAuthenticator {
            repo,
            extensions: ExtensionsHandler::new(repo, extensible_fields),
        }
    }

    fn authenticate_common_record(
        &self,
        record: &Record,
        group_id: &str,
    ) -> Result<Vec<ValidationMessage>> {
        let record_id = record.record_id().unwrap_or("");
        let owner = record.owner();

        let stored = match self.repo.fetch_record(record_id, RAWREPO_COMMON_AGENCY_ID)? {
            Some(stored) => stored,
            None => {
                let message = match owner {
                    None => "Du har ikke ret til at oprette en fællesskabspost",
                    Some(owner) if owner != group_id => {
                        "Du har ikke ret til at oprette en fællesskabspost for et andet bibliotek."
                    }
                    Some(_) => return Ok(Vec::new()),
                };
                return Ok(vec![ValidationMessage::record_error(message)]);
            }
        };

        let stored_owner = stored.owner().unwrap_or("");
        if stored_owner == "DBC" {
            return Ok(vec![ValidationMessage::record_error(
                "Du har ikke ret til at opdatere en fællesskabspost som er ejet af DBC",
            )]);
        }
        if stored_owner != RELEASED_OWNER && !is_fbs_agency(stored_owner) {
            return Ok(vec![ValidationMessage::record_error(
                "Du har ikke ret til at opdatere en fællesskabspost som ikke er ejet af et folkebibliotek.",
            )]);
        }
        if owner != Some(group_id) {
            return Ok(vec![ValidationMessage::record_error(
                "Du har ikke ret til at opdatere fællesskabsposten for et andet bibliotek.",
            )]);
        }
        self.extensions.authenticate_extensions(record, group_id)
    }

    /// Build or refresh the DBC enrichment companion mirroring the common
    /// record's owner in its s10 field. Returns `None` when the stored
    /// companion already carries the owner.
    fn dbc_enrichment_companion(&self, record: &Record, owner: &str) -> Result<Option<Record>> {
        let record_id = record.record_id().unwrap_or("");
        let mut s10 = Field::new("s10", "00");
        s10.add_subfield('a', owner);

        match self
            .repo
            .fetch_record(record_id, RAWREPO_DBC_ENRICHMENT_AGENCY_ID)?
        {
            Some(stored) => {
                let mut updated = stored.clone();
                updated.remove_fields("s10");
                insert_field_sorted(&mut updated, s10);
                if updated == stored {
                    debug!(record_id, "enrichment companion already carries the owner");
                    Ok(None)
                } else {
                    Ok(Some(updated))
                }
            }
            None => {
                let mut companion = Record::new();
                if let Some(f001) = record.first_field("001") {
                    let mut f001 = f001.clone();
                    f001.set_subfield('b', RAWREPO_DBC_ENRICHMENT_AGENCY_ID);
                    companion.add_field(f001);
                }
                insert_field_sorted(&mut companion, s10);
                Ok(Some(companion))
            }
        }
    }
}

impl<R: RawRepo> Authenticator for FbsAuthenticator<'_, R> {
    fn can_authenticate(&self, group_id: &str) -> bool {
        is_fbs_agency(group_id)
    }

    fn authenticate_record(
        &self,
        record: &Record,
        _user_id: &str,
        group_id: &str,
    ) -> Result<Vec<ValidationMessage>> {
        let record_id = record.record_id().unwrap_or("");
        let agency_id = record.agency_id().unwrap_or("");
        if agency_id == group_id {
            return Ok(Vec::new());
        }
        if agency_id == COMMON_AGENCY_ID {
            return self.authenticate_common_record(record, group_id);
        }
        Ok(vec![ValidationMessage::record_error(format!(
            "Du har ikke ret til at rette posten '{record_id}' da den er ejet af et andet bibliotek."
        ))])
    }

    fn record_data_for_raw_repo(
        &self,
        record: &Record,
        _user_id: &str,
        group_id: &str,
    ) -> Result<Vec<Record>> {
        let mut common = self.extensions.record_data_for_raw_repo(record, group_id)?;
        if common.agency_id() != Some(COMMON_AGENCY_ID) {
            return Ok(vec![common]);
        }

        let owner = common.owner().map(str::to_string);
        common.set_first_value("001", 'b', RAWREPO_COMMON_AGENCY_ID);

        let companion = match owner {
            Some(owner) => self.dbc_enrichment_companion(&common, &owner)?,
            None => None,
        };
        let mut result = vec![common];
        result.extend(companion);
        Ok(result)
    }
}
