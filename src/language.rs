use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PhonemizeError;

/// A language recognized by the phonemizer.
///
/// Callers identify languages by a one-letter code. Each code maps to exactly
/// one engine locale.
///
/// | Code | Language | Locale |
/// |---|---|---|
/// | `a` | American English | `en-us` |
/// | `b` | British English | `en-gb` |
/// | `z` | Neutral | engine default voice |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    AmericanEnglish,
    BritishEnglish,
    Neutral,
}

impl Language {
    pub const ALL: [Language; 3] = [
        Language::AmericanEnglish,
        Language::BritishEnglish,
        Language::Neutral,
    ];

    /// Parse a caller-supplied language code.
    pub fn from_code(code: &str) -> Result<Self, PhonemizeError> {
        match code {
            "a" => Ok(Language::AmericanEnglish),
            "b" => Ok(Language::BritishEnglish),
            "z" => Ok(Language::Neutral),
            other => Err(PhonemizeError::UnsupportedLanguage(other.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::AmericanEnglish => "a",
            Language::BritishEnglish => "b",
            Language::Neutral => "z",
        }
    }

    /// Locale identifier used in logs and errors.
    pub fn locale(self) -> &'static str {
        match self {
            Language::AmericanEnglish => "en-us",
            Language::BritishEnglish => "en-gb",
            Language::Neutral => "neutral",
        }
    }

    /// espeak voice to select, or `None` to keep the engine's default voice.
    pub fn espeak_voice(self) -> Option<&'static str> {
        match self {
            Language::AmericanEnglish => Some("en-us"),
            Language::BritishEnglish => Some("en-gb"),
            Language::Neutral => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Language::AmericanEnglish => 0,
            Language::BritishEnglish => 1,
            Language::Neutral => 2,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PhonemizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
    }
}

impl TryFrom<String> for Language {
    type Error = PhonemizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::from_code(&value)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Language;
    use crate::error::PhonemizeError;

    #[test]
    fn maps_codes_to_locales() {
        assert_eq!(Language::from_code("a").unwrap().locale(), "en-us");
        assert_eq!(Language::from_code("b").unwrap().locale(), "en-gb");
        assert_eq!(Language::from_code("z").unwrap().espeak_voice(), None);
    }

    #[test]
    fn rejects_unknown_codes() {
        for code in ["", "A", "en-us", "j", "ab"] {
            assert!(matches!(
                Language::from_code(code),
                Err(PhonemizeError::UnsupportedLanguage(c)) if c == code
            ));
        }
    }

    #[test]
    fn codes_round_trip_through_parse() {
        for language in Language::ALL {
            assert_eq!(language.code().parse::<Language>().unwrap(), language);
        }
    }

    #[test]
    fn indices_are_distinct() {
        let mut seen = [false; 3];
        for language in Language::ALL {
            assert!(!seen[language.index()]);
            seen[language.index()] = true;
        }
    }

    #[test]
    fn deserializes_from_code() {
        let language: Language = serde_json::from_str("\"b\"").unwrap();
        assert_eq!(language, Language::BritishEnglish);
        assert!(serde_json::from_str::<Language>("\"x\"").is_err());
    }
}
