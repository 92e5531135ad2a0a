//! Incident persistence trait

use crate::error::ModerationError;
use crate::incident::{Incident, NewIncident};
use async_trait::async_trait;

/// Persists a record of every rejected upload.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn record_incident(&self, incident: NewIncident) -> Result<Incident, ModerationError>;
}
