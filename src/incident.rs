//! Incident records for rejected uploads
//!
//! The validation layer builds a [`NewIncident`] for every rejected image and
//! hands it to an [`IncidentStore`](crate::traits::IncidentStore). Hosts with a
//! database implement the trait themselves; [`InMemoryIncidentStore`] covers
//! everything else.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModerationError;
use crate::traits::IncidentStore;
use crate::types::ModerationReport;

/// Identity of the user an upload belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef(pub String);

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incident to persist
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub user: UserRef,
    pub image: Bytes,
    pub report: ModerationReport,
    /// Previous warning count plus one
    pub warning_count: u32,
}

/// Persisted incident
#[derive(Debug, Clone)]
pub struct Incident {
    pub id: Uuid,
    pub user: UserRef,
    pub image: Bytes,
    pub report: ModerationReport,
    pub warning_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Incident {
    pub fn from_new(new: NewIncident) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: new.user,
            image: new.image,
            report: new.report,
            warning_count: new.warning_count,
            created_at: Utc::now(),
        }
    }
}

/// Process-local incident store
#[derive(Debug, Default)]
pub struct InMemoryIncidentStore {
    incidents: Mutex<Vec<Incident>>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.incidents.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn incidents(&self) -> Vec<Incident> {
        self.incidents
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    pub fn incidents_for_user(&self, user: &UserRef) -> Vec<Incident> {
        self.incidents
            .lock()
            .map(|g| g.iter().filter(|i| &i.user == user).cloned().collect())
            .unwrap_or_default()
    }

    /// Highest warning count recorded for `user`, 0 when none.
    pub fn warning_count_for_user(&self, user: &UserRef) -> u32 {
        self.incidents
            .lock()
            .map(|g| {
                g.iter()
                    .filter(|i| &i.user == user)
                    .map(|i| i.warning_count)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn record_incident(&self, incident: NewIncident) -> Result<Incident, ModerationError> {
        let incident = Incident::from_new(incident);
        let mut guard = self
            .incidents
            .lock()
            .map_err(|e| ModerationError::StorageError(format!("incident store poisoned: {e}")))?;
        guard.push(incident.clone());
        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModerationLabel;

    fn new_incident(user: &str, warning_count: u32) -> NewIncident {
        NewIncident {
            user: UserRef::new(user),
            image: Bytes::from_static(b"\x89PNG"),
            report: ModerationReport {
                labels: vec![ModerationLabel::new("Violence", 80.0, "")],
                model_version: "7.0".into(),
            },
            warning_count,
        }
    }

    #[tokio::test]
    async fn records_and_filters_by_user() {
        let store = InMemoryIncidentStore::new();
        assert!(store.is_empty());

        store.record_incident(new_incident("alice", 1)).await.unwrap();
        store.record_incident(new_incident("bob", 1)).await.unwrap();
        store.record_incident(new_incident("alice", 2)).await.unwrap();

        assert_eq!(store.len(), 3);
        let alice = UserRef::new("alice");
        assert_eq!(store.incidents_for_user(&alice).len(), 2);
        assert_eq!(store.warning_count_for_user(&alice), 2);
        assert_eq!(store.warning_count_for_user(&UserRef::new("carol")), 0);
    }

    #[tokio::test]
    async fn recorded_incident_keeps_report() {
        let store = InMemoryIncidentStore::new();
        let stored = store.record_incident(new_incident("alice", 3)).await.unwrap();
        assert_eq!(stored.warning_count, 3);
        assert_eq!(stored.report.labels.len(), 1);
        assert_eq!(store.incidents()[0].id, stored.id);
    }
}
