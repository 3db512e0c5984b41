//! The supported-language catalogue.
//!
//! English plus eleven Indian languages. Which of them are enabled for a
//! deployment is configuration; the catalogue itself is fixed.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Telugu,
    Marathi,
    Tamil,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
    Odia,
    Assamese,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Telugu,
        Language::Marathi,
        Language::Tamil,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Punjabi,
        Language::Odia,
        Language::Assamese,
    ];

    /// Human-readable name, as placed into prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Tamil => "Tamil",
            Language::Gujarati => "Gujarati",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Punjabi => "Punjabi",
            Language::Odia => "Odia",
            Language::Assamese => "Assamese",
        }
    }

    /// Two-letter code used by language pickers.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Tamil => "ta",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Punjabi => "pa",
            Language::Odia => "or",
            Language::Assamese => "as",
        }
    }

    /// Look up a language by name or code, ignoring case and surrounding
    /// whitespace.
    pub fn lookup(input: &str) -> Option<Language> {
        let needle = input.trim();
        Language::ALL.into_iter().find(|lang| {
            lang.name().eq_ignore_ascii_case(needle) || lang.code().eq_ignore_ascii_case(needle)
        })
    }

    /// Like `lookup`, but anything unknown resolves to English.
    pub fn lookup_or_default(input: &str) -> Language {
        Language::lookup(input).unwrap_or_default()
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
