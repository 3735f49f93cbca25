//! Request, response and provider-result types for the aggregation service
//!
//! Everything here is request-scoped: entities are built fresh for one
//! inbound call and dropped once the response is serialized. No state is
//! shared across requests.

use crate::{AggregatorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inbound aggregation request body
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureRequest {
    /// Destination the caller wants suggestions for, used verbatim (after
    /// percent-encoding) as the upstream query value
    pub destination: String,
    /// Time budget for the trip in hours
    #[serde(default)]
    pub duration_hours: Option<f64>,
    /// Free-form prompt; only acted on when it matches the special trigger
    #[serde(default)]
    pub special_prompt: Option<String>,
}

impl AdventureRequest {
    /// Validate the request invariants for the given request kind.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the destination is blank, the duration
    /// is not positive, or a kind that needs a duration was called without one.
    pub fn validate(&self, kind: RequestKind) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(AggregatorError::validation("destination must not be empty"));
        }

        if let Some(hours) = self.duration_hours
            && (!hours.is_finite() || hours <= 0.0)
        {
            return Err(AggregatorError::validation(
                "durationHours must be a positive number",
            ));
        }

        if matches!(kind, RequestKind::Plan | RequestKind::Combined)
            && self.duration_hours.is_none()
        {
            return Err(AggregatorError::validation(
                "durationHours is required for plan requests",
            ));
        }

        Ok(())
    }
}

/// Discriminator selecting which subset of providers a request triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestKind {
    /// Resolve the destination to a display name only
    #[default]
    Place,
    /// Current weather summary only
    Weather,
    /// Model-generated adventure plan only
    Plan,
    /// Place, weather, plan and news merged into one payload
    Combined,
    /// Hard-coded single-answer branch, gated on the trigger phrase
    Special,
}

impl FromStr for RequestKind {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "place" => Ok(Self::Place),
            "weather" => Ok(Self::Weather),
            "plan" => Ok(Self::Plan),
            "combined" => Ok(Self::Combined),
            "special" => Ok(Self::Special),
            other => Err(AggregatorError::validation(format!(
                "unrecognized request kind: {other}"
            ))),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Place => "place",
            Self::Weather => "weather",
            Self::Plan => "plan",
            Self::Combined => "combined",
            Self::Special => "special",
        };
        write!(f, "{name}")
    }
}

/// How a provider call concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Upstream answered and the expected field was present
    Ok,
    /// Upstream answered but the expected field was absent; the documented
    /// default was substituted
    Fallback,
    /// Transport error, non-2xx status, malformed body or timeout; the
    /// documented default was substituted
    Failed,
}

/// Result of one provider call. Every call yields one of these; a raw
/// unchecked payload never flows downstream.
#[derive(Debug, Clone)]
pub struct ProviderResult<T> {
    /// How the call concluded
    pub outcome: Outcome,
    /// Normalized value, or the documented default on fallback/failure
    pub value: T,
    /// Wall-clock time the call took
    pub latency_ms: u64,
}

impl<T> ProviderResult<T> {
    /// Successful call with the expected field present
    pub fn ok(value: T, latency_ms: u64) -> Self {
        Self {
            outcome: Outcome::Ok,
            value,
            latency_ms,
        }
    }

    /// Upstream answered but the expected field was missing
    pub fn fallback(value: T, latency_ms: u64) -> Self {
        Self {
            outcome: Outcome::Fallback,
            value,
            latency_ms,
        }
    }

    /// Call failed outright; carries the default so merging stays uniform
    pub fn failed(value: T, latency_ms: u64) -> Self {
        Self {
            outcome: Outcome::Failed,
            value,
            latency_ms,
        }
    }

    /// Whether the value is a substituted default rather than upstream data
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !matches!(self.outcome, Outcome::Ok)
    }
}

/// Structured plan extracted from model output, or the deterministic fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurePlan {
    /// Short description of the suggested adventure
    pub adventure: String,
    /// Ordered to-do items, three expected but not enforced
    pub todo: Vec<String>,
    /// Ordered tips, three expected but not enforced
    pub tips: Vec<String>,
}

/// Merged response payload. Only the fields the request kind produced are
/// serialized; `error` is mutually exclusive with every other field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdventureResponse {
    /// Resolved display name of the destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Weather summary, e.g. "clear sky, 59°F"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    /// Adventure description from the generated plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adventure: Option<String>,
    /// To-do items from the generated plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<Vec<String>>,
    /// Tips from the generated plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    /// Headline text for the destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<String>,
    /// Image URL accompanying the headline, empty when the article had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Single answer returned by the special branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Generic error message; present only on 400/500 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdventureResponse {
    /// Error-only response; all other fields stay absent by construction
    #[must_use]
    pub fn from_error<S: Into<String>>(message: S) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Merge a generated plan into the response
    pub fn with_plan(mut self, plan: AdventurePlan) -> Self {
        self.adventure = Some(plan.adventure);
        self.todo = Some(plan.todo);
        self.tips = Some(plan.tips);
        self
    }
}
