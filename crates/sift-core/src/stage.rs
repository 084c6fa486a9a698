//! Stage vocabulary and normalization.
//!
//! Candidates move through a pipeline of stages. Local triage actions only
//! ever assign one of the three canonical buckets (`Review`, `Interview`,
//! `Rejection`); the provider may carry downstream labels ("Stage 3
//! Scheduled", "Onboarding", "Waitlist") which round-trip unchanged.
//!
//! [`Stage::normalize`] is pure and total: unrecognized input is valid
//! output, and normalizing an already-normalized value is a no-op.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A candidate's pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Awaiting triage. The default for candidates with no remote stage.
    Review,
    /// Selected for an interview.
    Interview,
    /// Passed over.
    Rejection,
    /// Provider-specific downstream label, passed through verbatim.
    Other(String),
}

impl Stage {
    /// Display label for this stage.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Review => "Review",
            Self::Interview => "Interview",
            Self::Rejection => "Rejection",
            Self::Other(raw) => raw,
        }
    }

    /// Map an arbitrary provider/legacy stage string to a [`Stage`].
    ///
    /// Rules, in priority order:
    /// 1. Empty or absent input defaults to `Review`.
    /// 2. Legacy tokens from the deprecated vocabulary: `pending`,
    ///    `interview`, `done`.
    /// 3. Case/format variants of "Stage 1" / "Stage 2".
    /// 4. Anything else passes through unchanged.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Review;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Review;
        }

        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            // Canonical labels map to themselves so normalization is
            // idempotent at the enum level.
            "review" | "pending" | "stage 1" | "stage1" => Self::Review,
            "interview" | "stage 2" | "stage2" => Self::Interview,
            "rejection" | "done" => Self::Rejection,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// True if this stage belongs to the rejected bucket for styling and
    /// hidden-set coupling (any label containing "reject").
    #[must_use]
    pub fn is_rejection_class(&self) -> bool {
        StageClass::of(self.label()) == StageClass::Rejected
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StageVisitor;

        impl Visitor<'_> for StageVisitor {
            type Value = Stage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a stage label string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Stage, E> {
                Ok(Stage::normalize(Some(value)))
            }
        }

        deserializer.deserialize_str(StageVisitor)
    }
}

/// Style bucket derived from a stage label by a fixed keyword cascade.
///
/// The cascade is ordered: earlier matches win ("Stage 4 Rejected" would be
/// rejected, not accepted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageClass {
    Rejected,
    Accepted,
    Stage3,
    Interview,
    Waitlist,
    Review,
    Default,
}

impl StageClass {
    /// Classify a stage label for display styling.
    #[must_use]
    pub fn of(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        if lower.contains("reject") {
            Self::Rejected
        } else if lower.contains("stage 4") || lower.contains("onboard") {
            Self::Accepted
        } else if lower.contains("stage 3") {
            Self::Stage3
        } else if lower.contains("interview") || lower.contains("stage 2") {
            Self::Interview
        } else if lower.contains("waitlist") {
            Self::Waitlist
        } else if lower.contains("stage 1") {
            Self::Review
        } else {
            Self::Default
        }
    }
}
