//! Authorization policy for DBC agencies.
//!
//! DBC cataloguers may create and edit anything, with one restriction: the
//! ownership subfield 996a of a stored record must not change. Changing
//! the owner of a shared record is reserved for the takeover flow of the
//! library policy.

use crate::agency::is_dbc_agency;
use crate::authenticator::Authenticator;
use crate::error::Result;
use crate::messages::ValidationMessage;
use crate::record::Record;
use crate::repository::RawRepo;

/// Authorization policy for records submitted by DBC agencies.
#[derive(Debug)]
pub struct DbcAuthenticator<'a, R> {
    repo: &'a R,
}

impl<'a, R: RawRepo> DbcAuthenticator<'a, R> {
    /// Create the policy over a repository.
    pub fn new(repo: &'a R) -> Self {
        DbcAuthenticator { repo }
    }
}

impl<R: RawRepo> Authenticator for DbcAuthenticator<'_, R> {
    fn can_authenticate(&self, group_id: &str) -> bool {
        is_dbc_agency(group_id)
    }

    fn authenticate_record(
        &self,
        record: &Record,
        _user_id: &str,
        group_id: &str,
    ) -> Result<Vec<ValidationMessage>> {
        let record_id = record.record_id().unwrap_or("");
        let agency_id = record.agency_id().unwrap_or("");
        let stored = match self.repo.fetch_record(record_id, agency_id)? {
            Some(stored) => stored,
            None => return Ok(Vec::new()),
        };
        if stored.owner() != record.owner() {
            return Ok(vec![ValidationMessage::record_error(format!(
                "Brugeren '{group_id}' må ikke ændret værdien af felt 996a i posten '{record_id}'"
            ))]);
        }
        Ok(Vec::new())
    }

    fn record_data_for_raw_repo(
        &self,
        record: &Record,
        _user_id: &str,
        _group_id: &str,
    ) -> Result<Vec<Record>> {
        Ok(vec![record.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;
    use crate::repository::MemoryRepo;

    fn record(record_id: &str, agency_id: &str, owner: Option<&str>) -> Record {
        let mut f001 = Field::new("001", "00");
        f001.add_subfield('a', record_id);
        f001.add_subfield('b', agency_id);
        let mut r = Record::new();
        r.add_field(f001);
        if let Some(owner) = owner {
            let mut f996 = Field::new("996", "00");
            f996.add_subfield('a', owner);
            r.add_field(f996);
        }
        r
    }

    #[test]
    fn test_claims_dbc_agencies_only() {
        let repo = MemoryRepo::new();
        let authenticator = DbcAuthenticator::new(&repo);
        assert!(authenticator.can_authenticate("010100"));
        assert!(authenticator.can_authenticate("870970"));
        assert!(!authenticator.can_authenticate("714700"));
    }

    #[test]
    fn test_new_record_is_approved() {
        let repo = MemoryRepo::new();
        let authenticator = DbcAuthenticator::new(&repo);
        let r = record("20611529", "870970", Some("DBC"));
        assert!(authenticator
            .authenticate_record(&r, "netpunkt", "010100")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_changing_owner_is_rejected() {
        let mut repo = MemoryRepo::new();
        repo.add_record(record("20611529", "870970", Some("DBC")))
            .unwrap();
        let authenticator = DbcAuthenticator::new(&repo);

        let update = record("20611529", "870970", Some("714700"));
        let messages = authenticator
            .authenticate_record(&update, "netpunkt", "010100")
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].message(),
            "Brugeren '010100' må ikke ændret værdien af felt 996a i posten '20611529'"
        );
    }

    #[test]
    fn test_unchanged_owner_is_approved() {
        let mut repo = MemoryRepo::new();
        repo.add_record(record("20611529", "870970", Some("DBC")))
            .unwrap();
        let authenticator = DbcAuthenticator::new(&repo);

        let update = record("20611529", "870970", Some("DBC"));
        assert!(authenticator
            .authenticate_record(&update, "netpunkt", "010100")
            .unwrap()
            .is_empty());

        let stored = authenticator
            .record_data_for_raw_repo(&update, "netpunkt", "010100")
            .unwrap();
        assert_eq!(stored, vec![update]);
    }
}
