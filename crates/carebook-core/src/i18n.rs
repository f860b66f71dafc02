//! Bundled translations.
//!
//! Resources are nested JSON objects addressed by dotted keys
//! (`"sepa.ibanInvalid"`). A key missing from the active language falls back
//! to German, and a key missing from German too is returned as-is so the
//! gap is visible instead of silently blank.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

const GERMAN_RESOURCES: &str = include_str!("../data/locales/de.json");
const ENGLISH_RESOURCES: &str = include_str!("../data/locales/en.json");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "de")]
    German,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::German, Language::English];

    pub fn code(&self) -> &'static str {
        match self {
            Language::German => "de",
            Language::English => "en",
        }
    }

    /// Name of the language in itself.
    pub fn label(&self) -> &'static str {
        match self {
            Language::German => "Deutsch",
            Language::English => "English",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        Self::ALL.into_iter().find(|lang| lang.code() == primary)
    }

    /// The language after this one, wrapping around.
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn resources(&self) -> &'static str {
        match self {
            Language::German => GERMAN_RESOURCES,
            Language::English => ENGLISH_RESOURCES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

/// Read-only text lookup handed to whatever renders the form.
pub trait Translator {
    fn language(&self) -> Language;

    /// Text for `key`, or `key` itself when no bundle has it.
    fn t<'a>(&'a self, key: &'a str) -> &'a str;
}

#[derive(Debug, Clone)]
pub struct Translations {
    language: Language,
    active: Value,
    fallback: Value,
}

impl Translations {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            active: parse_bundle(language),
            fallback: parse_bundle(Language::German),
        }
    }

    /// Switch the active bundle. Nothing else changes.
    pub fn set_language(&mut self, language: Language) {
        if language != self.language {
            self.language = language;
            self.active = parse_bundle(language);
        }
    }

    fn lookup<'a>(bundle: &'a Value, key: &str) -> Option<&'a str> {
        key.split('.')
            .try_fold(bundle, |node, part| node.get(part))
            .and_then(Value::as_str)
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Translator for Translations {
    fn language(&self) -> Language {
        self.language
    }

    fn t<'a>(&'a self, key: &'a str) -> &'a str {
        Self::lookup(&self.active, key)
            .or_else(|| Self::lookup(&self.fallback, key))
            .unwrap_or(key)
    }
}

fn parse_bundle(language: Language) -> Value {
    serde_json::from_str(language.resources()).unwrap_or_else(|e| {
        warn!(language = %language, error = %e, "Failed to parse translation bundle");
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iban::IbanError;
    use crate::models::{ChildField, Consent, DepartureMode, Gender, NotesField, PersonField, Salutation, Weekday};
    use crate::steps::Step;

    fn keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    let key = if prefix.is_empty() { k.clone() } else { format!("{}.{}", prefix, k) };
                    keys(v, &key, out);
                }
            }
            _ => out.push(prefix.to_string()),
        }
    }

    #[test]
    fn test_bundles_parse() {
        for lang in Language::ALL {
            assert!(parse_bundle(lang).is_object(), "{} bundle is not an object", lang);
        }
    }

    #[test]
    fn test_bundles_have_same_keys() {
        let mut german = Vec::new();
        let mut english = Vec::new();
        keys(&parse_bundle(Language::German), "", &mut german);
        keys(&parse_bundle(Language::English), "", &mut english);
        german.sort();
        english.sort();
        assert_eq!(german, english);
    }

    #[test]
    fn test_lookup_and_fallback() {
        let de = Translations::new(Language::German);
        let en = Translations::new(Language::English);

        assert_eq!(de.t("weekdays.monday"), "Montag");
        assert_eq!(en.t("weekdays.monday"), "Monday");
        assert_eq!(en.t("does.not.exist"), "does.not.exist");
        assert_eq!(de.t("steps"), "steps");
    }

    #[test]
    fn test_model_keys_are_translated() {
        let de = Translations::default();
        let mut model_keys: Vec<&str> = Vec::new();
        model_keys.extend(Step::ALL.iter().map(|s| s.title_key()));
        model_keys.extend(Weekday::ALL.iter().map(|d| d.label_key()));
        model_keys.extend(Consent::ALL.iter().map(|c| c.label_key()));
        model_keys.extend(Salutation::ALL.iter().map(|s| s.label_key()));
        model_keys.extend(PersonField::ALL.iter().map(|f| f.label_key()));
        model_keys.extend(Gender::ALL.iter().map(|g| g.label_key()));
        model_keys.extend(ChildField::ALL.iter().map(|f| f.label_key()));
        model_keys.extend(DepartureMode::ALL.iter().map(|m| m.label_key()));
        model_keys.extend(NotesField::ALL.iter().map(|f| f.label_key()));
        model_keys.push(IbanError::InvalidGermanIban.message_key());

        for key in model_keys {
            assert_ne!(de.t(key), key, "missing translation for {}", key);
        }
    }

    #[test]
    fn test_set_language() {
        let mut translations = Translations::default();
        assert_eq!(translations.language(), Language::German);
        translations.set_language(Language::English);
        assert_eq!(translations.language(), Language::English);
        assert_eq!(translations.t("steps.payment"), "Payment");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert_eq!(Language::from_code("de-DE"), Some(Language::German));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert_eq!(Language::German.next(), Language::English);
        assert_eq!(Language::English.next(), Language::German);
    }
}
