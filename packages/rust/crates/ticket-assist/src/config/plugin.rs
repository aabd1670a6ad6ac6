//! `config.json`: deployment-wide assistant settings.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::i18n::DEFAULT_LANGUAGE;

use super::read_json;

/// Handoff threshold used when `maxIAMessages` is absent or unusable.
pub const DEFAULT_MAX_ASSISTANT_MESSAGES: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub assistant_key: String,
    /// Accepted for compatibility with existing deployments; not used for routing.
    #[serde(default)]
    pub confidence_threshold: Option<Value>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub staff_role_id: Option<String>,
    #[serde(default)]
    pub dev_role_id: Option<String>,
    /// Number or numeric string; anything else is resolved by [`Self::message_limit`].
    #[serde(default, rename = "maxIAMessages")]
    pub max_ia_messages: Option<Value>,
}

fn default_enabled() -> bool {
    true
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            assistant_key: String::new(),
            confidence_threshold: None,
            language: None,
            staff_role_id: None,
            dev_role_id: None,
            max_ia_messages: None,
        }
    }
}

impl AssistConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// Notice language; blank or missing means [`DEFAULT_LANGUAGE`].
    pub fn language(&self) -> &str {
        non_empty(self.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn staff_role_id(&self) -> Option<&str> {
        non_empty(self.staff_role_id.as_deref())
    }

    pub fn dev_role_id(&self) -> Option<&str> {
        non_empty(self.dev_role_id.as_deref())
    }

    pub fn confidence_threshold(&self) -> Option<f64> {
        self.confidence_threshold.as_ref().and_then(numeric)
    }

    /// Number of assistant replies after which the ticket goes to staff.
    ///
    /// A fractional limit is reached on the first whole reply count at or
    /// above it. Missing, non-numeric, zero or negative values use
    /// [`DEFAULT_MAX_ASSISTANT_MESSAGES`].
    pub fn message_limit(&self) -> u32 {
        let Some(raw) = self.max_ia_messages.as_ref().filter(|value| !value.is_null()) else {
            return DEFAULT_MAX_ASSISTANT_MESSAGES;
        };
        match numeric(raw).and_then(whole_limit) {
            Some(value) => value,
            None => {
                tracing::warn!(
                    value = ?self.max_ia_messages,
                    fallback = DEFAULT_MAX_ASSISTANT_MESSAGES,
                    "invalid maxIAMessages; using default"
                );
                DEFAULT_MAX_ASSISTANT_MESSAGES
            }
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_limit(value: f64) -> Option<u32> {
    let limit = value.ceil();
    if limit < 1.0 || limit > f64::from(u32::MAX) {
        return None;
    }
    Some(limit as u32)
}

/// Discord role mention token (`<@&id>`).
pub fn role_mention(role_id: &str) -> String {
    format!("<@&{role_id}>")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> AssistConfig {
        serde_json::from_str(raw).unwrap_or_else(|err| panic!("config should parse: {err}"))
    }

    #[test]
    fn message_limit_accepts_number_and_string() {
        assert_eq!(parse(r#"{"maxIAMessages": 4}"#).message_limit(), 4);
        assert_eq!(parse(r#"{"maxIAMessages": "7"}"#).message_limit(), 7);
    }

    #[test]
    fn message_limit_falls_back_on_garbage_or_zero() {
        assert_eq!(parse(r#"{"maxIAMessages": "many"}"#).message_limit(), 10);
        assert_eq!(parse(r#"{"maxIAMessages": 0}"#).message_limit(), 10);
        assert_eq!(parse("{}").message_limit(), 10);
        assert_eq!(parse(r#"{"maxIAMessages": null}"#).message_limit(), 10);
        assert_eq!(parse(r#"{"maxIAMessages": [3]}"#).message_limit(), 10);
    }

    #[test]
    fn negative_message_limit_does_not_reject_the_document() {
        assert_eq!(parse(r#"{"maxIAMessages": -1}"#).message_limit(), 10);
        assert_eq!(parse(r#"{"maxIAMessages": "-3"}"#).message_limit(), 10);
    }

    #[test]
    fn fractional_message_limit_rounds_up() {
        assert_eq!(parse(r#"{"maxIAMessages": 5.0}"#).message_limit(), 5);
        assert_eq!(parse(r#"{"maxIAMessages": "2.5"}"#).message_limit(), 3);
        assert_eq!(parse(r#"{"maxIAMessages": 0.4}"#).message_limit(), 1);
    }

    #[test]
    fn confidence_threshold_tolerates_strings_and_garbage() {
        let as_text = parse(r#"{"confidenceThreshold": "0.8"}"#);
        assert!(
            as_text
                .confidence_threshold()
                .is_some_and(|threshold| (threshold - 0.8).abs() < f64::EPSILON)
        );
        assert_eq!(
            parse(r#"{"confidenceThreshold": {"min": 1}}"#).confidence_threshold(),
            None
        );
        assert_eq!(parse("{}").confidence_threshold(), None);
    }

    #[test]
    fn blank_language_and_roles_count_as_unset() {
        let config = parse(r#"{"language": " ", "staffRoleId": "", "devRoleId": "42"}"#);
        assert_eq!(config.language(), "fr");
        assert_eq!(config.staff_role_id(), None);
        assert_eq!(config.dev_role_id(), Some("42"));
        assert!(config.enabled);
    }
}
