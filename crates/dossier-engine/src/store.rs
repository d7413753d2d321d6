//! In-memory record store
//!
//! Test/demo double for the deployment's persistence layer. The real schema
//! and migrations live outside this repository.

use dossier_domain::traits::RecordStore;
use dossier_domain::{ApplicationStatus, ReconciliationOutcome};
use std::collections::HashMap;
use std::convert::Infallible;

/// Keeps outcomes and statuses in process memory
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    outcomes: HashMap<i64, ReconciliationOutcome>,
    statuses: HashMap<i64, (ApplicationStatus, Option<String>)>,
}

impl MemoryRecordStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved outcome for an application
    pub fn outcome(&self, application_id: i64) -> Option<&ReconciliationOutcome> {
        self.outcomes.get(&application_id)
    }

    /// Last recorded status for an application
    pub fn status(&self, application_id: i64) -> Option<&(ApplicationStatus, Option<String>)> {
        self.statuses.get(&application_id)
    }
}

impl RecordStore for MemoryRecordStore {
    type Error = Infallible;

    fn save_outcome(&mut self, outcome: &ReconciliationOutcome) -> Result<(), Self::Error> {
        self.outcomes.insert(outcome.application_id, outcome.clone());
        Ok(())
    }

    fn update_status(
        &mut self,
        application_id: i64,
        status: ApplicationStatus,
        message: Option<&str>,
    ) -> Result<(), Self::Error> {
        self.statuses
            .insert(application_id, (status, message.map(String::from)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        let mut store = MemoryRecordStore::new();
        store
            .update_status(9, ApplicationStatus::Processing, None)
            .unwrap();
        store
            .update_status(9, ApplicationStatus::Failed, Some("boom"))
            .unwrap();

        let (status, message) = store.status(9).unwrap();
        assert_eq!(*status, ApplicationStatus::Failed);
        assert_eq!(message.as_deref(), Some("boom"));
    }
}
