//! Upload validation
//!
//! [`ImageModerationField`] is what a web layer calls when an image is
//! uploaded: it moderates the bytes, and on a failed verdict stores an
//! incident for the uploading user before rejecting with a user-facing
//! message.

use std::sync::Arc;

use bytes::Bytes;

use crate::defaults;
use crate::error::{ModerationError, ValidationError};
use crate::evaluator::ModerationEvaluator;
use crate::incident::{NewIncident, UserRef};
use crate::policy::ModerationPolicy;
use crate::traits::{ImageModerationCapability, IncidentStore};
use crate::types::ModerationReport;

/// Who is uploading, and how many warnings they already have.
#[derive(Debug, Clone)]
pub struct UploadContext {
    pub user: UserRef,
    pub current_warning_count: u32,
}

impl UploadContext {
    pub fn new(user: UserRef) -> Self {
        Self {
            user,
            current_warning_count: 0,
        }
    }

    pub const fn with_warning_count(mut self, count: u32) -> Self {
        self.current_warning_count = count;
        self
    }
}

pub struct ImageModerationField {
    evaluator: ModerationEvaluator,
    incidents: Arc<dyn IncidentStore>,
    not_appropriate_text: String,
}

impl std::fmt::Debug for ImageModerationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageModerationField")
            .field("evaluator", &self.evaluator)
            .field("not_appropriate_text", &self.not_appropriate_text)
            .finish_non_exhaustive()
    }
}

impl ImageModerationField {
    pub fn new(evaluator: ModerationEvaluator, incidents: Arc<dyn IncidentStore>) -> Self {
        Self {
            evaluator,
            incidents,
            not_appropriate_text: defaults::moderation::NOT_APPROPRIATE_TEXT.to_string(),
        }
    }

    /// Build the evaluator from a backend and policy in one step.
    pub fn with_backend(
        backend: Arc<dyn ImageModerationCapability>,
        policy: ModerationPolicy,
        incidents: Arc<dyn IncidentStore>,
    ) -> Result<Self, ModerationError> {
        Ok(Self::new(ModerationEvaluator::new(backend, policy)?, incidents))
    }

    /// Override the rejection message.
    pub fn not_appropriate_text(mut self, text: impl Into<String>) -> Self {
        self.not_appropriate_text = text.into();
        self
    }

    pub fn policy(&self) -> &ModerationPolicy {
        self.evaluator.policy()
    }

    /// Validate an uploaded image.
    ///
    /// Returns the report when the image passes. A rejected image is recorded
    /// as an incident with `current_warning_count + 1` first; if that write
    /// fails the storage error is returned instead of the rejection.
    pub async fn validate(
        &self,
        image: impl Into<Bytes>,
        context: &UploadContext,
    ) -> Result<ModerationReport, ValidationError> {
        let image = image.into();
        let outcome = self.evaluator.moderate_image(image.clone()).await?;

        if outcome.is_appropriate {
            return Ok(outcome.report);
        }

        let policy = self.evaluator.policy();
        let violations = outcome
            .report
            .labels
            .iter()
            .filter(|l| policy.is_violation(&l.name, l.confidence))
            .count();
        let warning_count = context.current_warning_count.saturating_add(1);

        tracing::warn!(
            user = %context.user,
            warning_count,
            violations,
            "rejecting image upload"
        );

        self.incidents
            .record_incident(NewIncident {
                user: context.user.clone(),
                image,
                report: outcome.report,
                warning_count,
            })
            .await?;

        Err(ValidationError::Rejected(self.not_appropriate_text.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::{Incident, InMemoryIncidentStore};
    use crate::types::{ImageModerationRequest, ImageModerationResponse, ModerationLabel};
    use async_trait::async_trait;
    use tracing_test::traced_test;

    struct FixedBackend(Vec<ModerationLabel>);

    #[async_trait]
    impl ImageModerationCapability for FixedBackend {
        async fn detect_moderation_labels(
            &self,
            _request: ImageModerationRequest,
        ) -> Result<ImageModerationResponse, ModerationError> {
            Ok(ImageModerationResponse {
                labels: self.0.clone(),
                model_version: "7.0".into(),
            })
        }
    }

    struct DownBackend;

    #[async_trait]
    impl ImageModerationCapability for DownBackend {
        async fn detect_moderation_labels(
            &self,
            _request: ImageModerationRequest,
        ) -> Result<ImageModerationResponse, ModerationError> {
            Err(ModerationError::HttpError("connection refused".into()))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl IncidentStore for BrokenStore {
        async fn record_incident(
            &self,
            _incident: NewIncident,
        ) -> Result<Incident, ModerationError> {
            Err(ModerationError::StorageError("database is read-only".into()))
        }
    }

    fn field(labels: Vec<ModerationLabel>, store: Arc<dyn IncidentStore>) -> ImageModerationField {
        ImageModerationField::with_backend(
            Arc::new(FixedBackend(labels)),
            ModerationPolicy::default(),
            store,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn appropriate_image_returns_report_and_stores_nothing() {
        let store = Arc::new(InMemoryIncidentStore::new());
        let field = field(vec![ModerationLabel::new("Alcohol", 20.0, "")], store.clone());
        let ctx = UploadContext::new(UserRef::new("alice"));

        let report = field.validate(b"image".to_vec(), &ctx).await.unwrap();
        assert_eq!(report.labels.len(), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn rejected_image_records_incident() {
        let store = Arc::new(InMemoryIncidentStore::new());
        let labels = vec![
            ModerationLabel::new("Explicit Nudity", 91.0, ""),
            ModerationLabel::new("Nudity", 91.0, "Explicit Nudity"),
        ];
        let field = field(labels.clone(), store.clone());
        let ctx = UploadContext::new(UserRef::new("alice")).with_warning_count(2);

        let err = field.validate(b"image".to_vec(), &ctx).await.unwrap_err();
        match err {
            ValidationError::Rejected(msg) => {
                assert_eq!(msg, defaults::moderation::NOT_APPROPRIATE_TEXT)
            }
            other => panic!("expected rejection, got {other:?}"),
        }

        let incidents = store.incidents();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].user, UserRef::new("alice"));
        assert_eq!(incidents[0].warning_count, 3);
        assert_eq!(incidents[0].report.labels, labels);
        assert_eq!(incidents[0].image.as_ref(), b"image");
        assert!(logs_contain("rejecting image upload"));
    }

    #[tokio::test]
    async fn custom_rejection_message() {
        let store = Arc::new(InMemoryIncidentStore::new());
        let field = field(vec![ModerationLabel::new("Drugs", 88.0, "")], store)
            .not_appropriate_text("nope");
        let ctx = UploadContext::new(UserRef::new("bob"));

        let err = field.validate(b"image".to_vec(), &ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[tokio::test]
    async fn backend_failure_stores_nothing() {
        let store = Arc::new(InMemoryIncidentStore::new());
        let field = ImageModerationField::with_backend(
            Arc::new(DownBackend),
            ModerationPolicy::default(),
            store.clone(),
        )
        .unwrap();
        let ctx = UploadContext::new(UserRef::new("alice"));

        let err = field.validate(b"image".to_vec(), &ctx).await.unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Moderation(ModerationError::HttpError(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_surfaces_instead_of_rejection() {
        let field = field(
            vec![ModerationLabel::new("Violence", 99.0, "")],
            Arc::new(BrokenStore),
        );
        let ctx = UploadContext::new(UserRef::new("alice"));

        let err = field.validate(b"image".to_vec(), &ctx).await.unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Moderation(ModerationError::StorageError(_))
        ));
    }
}
