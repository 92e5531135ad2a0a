//! Moderation Decision Evaluator
//!
//! `evaluate_labels` is the pure decision: given labels already fetched from a
//! backend, record every one of them in a report and flag the image when any
//! label is in the policy's comparison set with confidence strictly above the
//! threshold. `ModerationEvaluator` adds the single backend round trip in
//! front of it.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::ModerationError;
use crate::policy::ModerationPolicy;
use crate::traits::ImageModerationCapability;
use crate::types::{
    ImageModerationRequest, ImageModerationResponse, ModerationLabel, ModerationOutcome,
    ModerationReport,
};

/// Apply `policy` to `labels`.
///
/// Every label lands in the report in input order. The scan never stops early
/// on a violation.
pub fn evaluate_labels(
    labels: Vec<ModerationLabel>,
    model_version: impl Into<String>,
    policy: &ModerationPolicy,
) -> ModerationOutcome {
    let mut is_appropriate = true;
    let mut report_labels = Vec::with_capacity(labels.len());

    for label in labels {
        if policy.is_violation(&label.name, label.confidence) {
            is_appropriate = false;
        }
        report_labels.push(label);
    }

    ModerationOutcome {
        is_appropriate,
        report: ModerationReport {
            labels: report_labels,
            model_version: model_version.into(),
        },
    }
}

/// Same as [`evaluate_labels`] for a whole backend response.
pub fn evaluate_response(
    response: ImageModerationResponse,
    policy: &ModerationPolicy,
) -> ModerationOutcome {
    evaluate_labels(response.labels, response.model_version, policy)
}

/// Sends an image to a moderation backend and applies a policy to the result.
#[derive(Clone)]
pub struct ModerationEvaluator {
    backend: Arc<dyn ImageModerationCapability>,
    policy: ModerationPolicy,
}

impl std::fmt::Debug for ModerationEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationEvaluator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ModerationEvaluator {
    /// Create an evaluator. Fails if the policy is invalid.
    pub fn new(
        backend: Arc<dyn ImageModerationCapability>,
        policy: ModerationPolicy,
    ) -> Result<Self, ModerationError> {
        policy.validate()?;
        Ok(Self { backend, policy })
    }

    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Fetch labels for `image` and decide whether it is appropriate.
    ///
    /// Backend failures are returned unchanged; there is no partial verdict.
    pub async fn moderate_image(
        &self,
        image: impl Into<Bytes>,
    ) -> Result<ModerationOutcome, ModerationError> {
        let response = self
            .backend
            .detect_moderation_labels(ImageModerationRequest::new(image))
            .await?;

        tracing::debug!(
            labels = response.labels.len(),
            model_version = %response.model_version,
            "received moderation labels"
        );

        Ok(evaluate_response(response, &self.policy))
    }
}
