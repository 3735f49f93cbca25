//! Structured-text extraction from model output
//!
//! Model answers are expected to contain a JSON object, optionally wrapped in
//! markdown code fences. Parse failure is expected and common; it degrades to
//! the deterministic fallback built from the request, never to an error.

use crate::models::AdventurePlan;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// To-do items used when the model output cannot be parsed
pub const FALLBACK_TODO: [&str; 3] = ["Visit a landmark", "Enjoy the view", "Take a break"];

/// Tips used when the model output cannot be parsed
pub const FALLBACK_TIPS: [&str; 3] = ["Pack light", "Stay hydrated", "Check local times"];

/// Expected shape of the adventure-description answer
#[derive(Debug, Deserialize)]
pub struct AdventureSection {
    /// Short adventure description
    pub adventure: String,
}

/// Expected shape of the to-do answer
#[derive(Debug, Deserialize)]
pub struct TodoSection {
    /// Ordered to-do items
    pub todo: Vec<String>,
}

/// Expected shape of the tips answer
#[derive(Debug, Deserialize)]
pub struct TipsSection {
    /// Ordered tips
    pub tips: Vec<String>,
}

/// Strip an optional leading/trailing markdown fence (with optional language
/// tag) and surrounding whitespace. Idempotent: running it on already
/// stripped text returns the same slice.
#[must_use]
pub fn strip_fences(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // language tag sits directly after the fence
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }

    text = text.trim_end();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Strip fences and parse the text against the expected shape. `None` on any
/// mismatch; the failure is logged for diagnosis and absorbed by the caller.
pub fn parse_section<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let cleaned = strip_fences(raw);
    match serde_json::from_str(cleaned) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(%error, "model output did not match the expected shape");
            None
        }
    }
}

/// Deterministic plan substituted when model output cannot be parsed
#[must_use]
pub fn fallback_plan(destination: &str, hours: f64) -> AdventurePlan {
    AdventurePlan {
        adventure: format!("Explore {destination} for {hours} hours!"),
        todo: FALLBACK_TODO.iter().map(ToString::to_string).collect(),
        tips: FALLBACK_TIPS.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("```json\n{\"adventure\": \"x\"}\n```")]
    #[case("```\n{\"adventure\": \"x\"}\n```")]
    #[case("```json {\"adventure\": \"x\"} ```")]
    #[case("  {\"adventure\": \"x\"}  ")]
    #[case("{\"adventure\": \"x\"}")]
    fn test_strip_fences_variants(#[case] raw: &str) {
        assert_eq!(strip_fences(raw), "{\"adventure\": \"x\"}");
    }

    #[test]
    fn test_strip_fences_is_idempotent() {
        let raw = "```json\n{\"todo\": [\"a\"]}\n```";
        let once = strip_fences(raw);
        assert_eq!(strip_fences(once), once);
    }

    #[test]
    fn test_parse_section_fenced_and_bare_agree() {
        let fenced: AdventureSection =
            parse_section("```json\n{\"adventure\": \"Walk the old town\"}\n```").unwrap();
        let bare: AdventureSection =
            parse_section("{\"adventure\": \"Walk the old town\"}").unwrap();
        assert_eq!(fenced.adventure, bare.adventure);
    }

    #[test]
    fn test_parse_section_is_deterministic() {
        let raw = "```json\n{\"tips\": [\"x\", \"y\", \"z\"]}\n```";
        let first: TipsSection = parse_section(raw).unwrap();
        let second: TipsSection = parse_section(raw).unwrap();
        assert_eq!(first.tips, second.tips);
    }

    #[rstest]
    #[case("the model got chatty and ignored the schema")]
    #[case("```json\n{\"adventure\": \"truncated")]
    #[case("{\"wrong_key\": true}")]
    #[case("")]
    fn test_parse_section_rejects_malformed_text(#[case] raw: &str) {
        assert!(parse_section::<AdventureSection>(raw).is_none());
    }

    #[test]
    fn test_parse_full_plan_shape() {
        let raw = "```json\n{\"adventure\": \"d\", \"todo\": [\"1\", \"2\", \"3\"], \"tips\": [\"1\", \"2\", \"3\"]}\n```";
        let plan: crate::models::AdventurePlan = parse_section(raw).unwrap();
        assert_eq!(plan.adventure, "d");
        assert_eq!(plan.todo.len(), 3);
        assert_eq!(plan.tips.len(), 3);
    }

    #[test]
    fn test_fallback_plan_embeds_request_fields() {
        let plan = fallback_plan("Lisbon, Portugal", 3.0);
        assert_eq!(plan.adventure, "Explore Lisbon, Portugal for 3 hours!");
        assert_eq!(plan.todo.len(), 3);
        assert_eq!(plan.tips.len(), 3);

        let plan = fallback_plan("Oslo", 2.5);
        assert!(plan.adventure.contains("2.5"));
    }
}
