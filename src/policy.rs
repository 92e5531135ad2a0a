//! Moderation policy
//!
//! A policy decides which labels count as violations: either a severity level
//! (0-4) selecting a fixed label tier, or an explicit label list that takes
//! precedence over the level. A matching label only counts when its confidence
//! is strictly greater than `min_confidence`.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ModerationError;

/// Label tiers indexed by severity level. Level 4 is the broadest.
pub const MODERATION_LEVELS: [&[&str]; 5] = [
    &[],
    &["Visually Disturbing"],
    &["Explicit Nudity", "Visually Disturbing", "Violence"],
    &[
        "Explicit Nudity",
        "Violence",
        "Visually Disturbing",
        "Gambling",
        "Hate Symbols",
    ],
    &[
        "Explicit Nudity",
        "Suggestive",
        "Violence",
        "Visually Disturbing",
        "Rude Gestures",
        "Drugs",
        "Tobacco",
        "Alcohol",
        "Gambling",
        "Hate Symbols",
    ],
];

/// Labels for `level`, or level 4's labels when the level is unknown
/// (negative or above 4).
pub fn labels_for_level(level: i64) -> &'static [&'static str] {
    usize::try_from(level)
        .ok()
        .and_then(|i| MODERATION_LEVELS.get(i))
        .copied()
        .unwrap_or(MODERATION_LEVELS[MODERATION_LEVELS.len() - 1])
}

/// Resolved set of label names a policy compares against.
#[derive(Debug, Clone, Copy)]
pub enum ComparisonSet<'a> {
    Level(&'static [&'static str]),
    Custom(&'a [String]),
}

impl ComparisonSet<'_> {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::Level(labels) => labels.contains(&name),
            Self::Custom(labels) => labels.iter().any(|l| l == name),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Level(labels) => labels.len(),
            Self::Custom(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationPolicy {
    /// Severity tier, 0-4. Unknown values behave like 4.
    #[serde(default = "default_level")]
    pub level: i64,
    /// Overrides `level` entirely when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_labels: Option<Vec<String>>,
    /// 0-100, compared with strict greater-than
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_level() -> i64 {
    defaults::moderation::LEVEL
}

fn default_min_confidence() -> f64 {
    defaults::moderation::MIN_CONFIDENCE
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            level: default_level(),
            custom_labels: None,
            min_confidence: default_min_confidence(),
        }
    }
}

impl ModerationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: i64) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    pub fn custom_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub const fn min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Active comparison set: the explicit list if present, else the level tier.
    pub fn comparison_set(&self) -> ComparisonSet<'_> {
        match &self.custom_labels {
            Some(labels) => ComparisonSet::Custom(labels),
            None => ComparisonSet::Level(labels_for_level(self.level)),
        }
    }

    /// Whether `confidence` for a label named `name` is a violation.
    pub fn is_violation(&self, name: &str, confidence: f64) -> bool {
        self.comparison_set().contains(name) && confidence > self.min_confidence
    }

    pub fn validate(&self) -> Result<(), ModerationError> {
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(ModerationError::ConfigurationError(format!(
                "min_confidence must be within [0, 100], got {}",
                self.min_confidence
            )));
        }
        if let Some(labels) = &self.custom_labels
            && labels.iter().any(|l| l.trim().is_empty())
        {
            return Err(ModerationError::ConfigurationError(
                "custom_labels must not contain blank names".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_grow_in_breadth() {
        assert!(labels_for_level(0).is_empty());
        assert_eq!(labels_for_level(1), &["Visually Disturbing"]);
        assert_eq!(labels_for_level(2).len(), 3);
        assert_eq!(labels_for_level(3).len(), 5);
        assert_eq!(labels_for_level(4).len(), 10);
    }

    #[test]
    fn unknown_level_falls_back_to_level_four() {
        assert_eq!(labels_for_level(5), labels_for_level(4));
        assert_eq!(labels_for_level(99), labels_for_level(4));
        assert_eq!(labels_for_level(300), labels_for_level(4));
        assert_eq!(labels_for_level(-1), labels_for_level(4));
        assert_eq!(labels_for_level(i64::MIN), labels_for_level(4));
    }

    #[test]
    fn custom_labels_override_level() {
        let policy = ModerationPolicy::with_level(1).custom_labels(["Tobacco"]);
        let set = policy.comparison_set();
        assert!(set.contains("Tobacco"));
        assert!(!set.contains("Visually Disturbing"));
    }

    #[test]
    fn empty_custom_list_still_overrides() {
        let policy = ModerationPolicy::with_level(4).custom_labels(Vec::<String>::new());
        assert!(policy.comparison_set().is_empty());
        assert!(!policy.is_violation("Explicit Nudity", 99.0));
    }

    #[test]
    fn threshold_is_strict() {
        let policy = ModerationPolicy::default();
        assert!(!policy.is_violation("Violence", 60.0));
        assert!(policy.is_violation("Violence", 60.01));
    }

    #[test]
    fn defaults_match_field_defaults() {
        let policy = ModerationPolicy::default();
        assert_eq!(policy.level, 4);
        assert_eq!(policy.min_confidence, 60.0);
        assert!(policy.custom_labels.is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let policy: ModerationPolicy = serde_json::from_str(r#"{"level": 2}"#).unwrap();
        assert_eq!(policy.level, 2);
        assert_eq!(policy.min_confidence, 60.0);
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        assert!(ModerationPolicy::new().min_confidence(100.0).validate().is_ok());
        assert!(ModerationPolicy::new().min_confidence(0.0).validate().is_ok());
        assert!(ModerationPolicy::new().min_confidence(100.5).validate().is_err());
        assert!(ModerationPolicy::new().min_confidence(-1.0).validate().is_err());
        assert!(ModerationPolicy::new().min_confidence(f64::NAN).validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_custom_label() {
        let err = ModerationPolicy::new()
            .custom_labels(["Drugs", "  "])
            .validate()
            .unwrap_err();
        assert!(matches!(err, ModerationError::ConfigurationError(_)));
    }
}
