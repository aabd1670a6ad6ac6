//! Localized session notices: `(language, key, variables) -> text`.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::ConfigError;

/// Language used when the requested one has no entry for a key.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Returned when neither the requested nor the default language defines a key.
pub const MISSING_MESSAGE_FALLBACK: &str = "❌ Message non défini.";

const BUNDLED_LANGUAGES: &str = include_str!("languages.json");

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(.*?)\}\}").unwrap_or_else(|err| panic!("invalid placeholder regex: {err}"))
});

/// Closed set of notices the session emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Welcome,
    Transferred,
    Failure,
    Error,
}

impl MessageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Transferred => "transferred",
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }
}

impl Display for MessageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LanguageEntry {
    welcome: Option<String>,
    transferred: Option<String>,
    failure: Option<String>,
    error: Option<String>,
}

impl LanguageEntry {
    fn get(&self, key: MessageKey) -> Option<&str> {
        let value = match key {
            MessageKey::Welcome => self.welcome.as_deref(),
            MessageKey::Transferred => self.transferred.as_deref(),
            MessageKey::Failure => self.failure.as_deref(),
            MessageKey::Error => self.error.as_deref(),
        };
        value.filter(|text| !text.is_empty())
    }
}

/// Translation tables keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    languages: HashMap<String, LanguageEntry>,
}

impl Translations {
    /// Tables compiled into the binary (French and English).
    pub fn bundled() -> Self {
        match Self::from_json_str(BUNDLED_LANGUAGES) {
            Ok(translations) => translations,
            Err(error) => {
                tracing::warn!(error = %error, "bundled languages.json is invalid; using fallback text");
                Self::default()
            }
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let languages = serde_json::from_str::<HashMap<String, LanguageEntry>>(raw)?;
        Ok(Self { languages })
    }

    /// Load tables from a `languages.json` document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Operator tables when a path is given and readable, bundled tables otherwise.
    pub fn load_or_bundled(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::bundled();
        };
        match Self::load(path) {
            Ok(translations) => translations,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to load languages file; using bundled translations"
                );
                Self::bundled()
            }
        }
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Resolve a notice, falling back to [`DEFAULT_LANGUAGE`] and then to
    /// [`MISSING_MESSAGE_FALLBACK`]. Each `{{name}}` becomes the matching
    /// variable, or nothing when the variable is absent or empty.
    pub fn resolve(&self, language: &str, key: MessageKey, variables: &[(&str, &str)]) -> String {
        let template = self
            .template(language, key)
            .or_else(|| self.template(DEFAULT_LANGUAGE, key))
            .unwrap_or(MISSING_MESSAGE_FALLBACK);
        interpolate(template, variables)
    }

    fn template(&self, language: &str, key: MessageKey) -> Option<&str> {
        self.languages.get(language).and_then(|entry| entry.get(key))
    }
}

fn interpolate(template: &str, variables: &[(&str, &str)]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            variables
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map_or("", |(_, value)| *value)
                .to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_cover_every_key_in_default_language() {
        let translations = Translations::bundled();
        for key in [
            MessageKey::Welcome,
            MessageKey::Transferred,
            MessageKey::Failure,
            MessageKey::Error,
        ] {
            let text = translations.resolve(DEFAULT_LANGUAGE, key, &[]);
            assert_ne!(text, MISSING_MESSAGE_FALLBACK, "missing {key}");
        }
    }

    fn sparse_tables() -> Translations {
        Translations::from_json_str(
            r#"{
                "fr": {"welcome": "Salut {{a}}{{b}}", "transferred": "Équipe {{staffRole}}"},
                "de": {"error": "", "transferred": "Team {{staffRole}}"}
            }"#,
        )
        .unwrap_or_else(|err| panic!("tables should parse: {err}"))
    }

    #[test]
    fn unknown_language_uses_default_language_entry() {
        let translations = sparse_tables();
        assert_eq!(
            translations.resolve("it", MessageKey::Welcome, &[("a", "X"), ("b", "Y")]),
            "Salut XY"
        );
        assert_eq!(
            translations.resolve("de", MessageKey::Welcome, &[("a", "X"), ("b", "Y")]),
            "Salut XY"
        );
    }

    #[test]
    fn requested_language_wins_when_it_has_the_key() {
        assert_eq!(
            sparse_tables().resolve("de", MessageKey::Transferred, &[("staffRole", "<@&1>")]),
            "Team <@&1>"
        );
    }

    #[test]
    fn key_missing_or_empty_everywhere_yields_fallback_text() {
        let translations = sparse_tables();
        assert_eq!(
            translations.resolve("de", MessageKey::Error, &[]),
            MISSING_MESSAGE_FALLBACK
        );
        assert_eq!(
            translations.resolve("fr", MessageKey::Failure, &[]),
            MISSING_MESSAGE_FALLBACK
        );
        assert_eq!(
            Translations::default().resolve("en", MessageKey::Welcome, &[]),
            MISSING_MESSAGE_FALLBACK
        );
    }

    #[test]
    fn absent_or_empty_variables_become_empty_text() {
        let translations = sparse_tables();
        assert_eq!(
            translations.resolve("fr", MessageKey::Welcome, &[("a", "X")]),
            "Salut X"
        );
        assert_eq!(
            translations.resolve("fr", MessageKey::Transferred, &[("staffRole", "")]),
            "Équipe "
        );
    }

    #[test]
    fn interpolate_leaves_plain_text_alone() {
        assert_eq!(interpolate("no placeholders {here}", &[]), "no placeholders {here}");
    }

    #[test]
    fn interpolate_does_not_span_lines() {
        assert_eq!(interpolate("{{a\nb}}", &[("a\nb", "x")]), "{{a\nb}}");
    }
}
