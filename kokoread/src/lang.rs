use crate::error::ConfigError;

/// Kokoro language codes: the first letter of every voice id.
const LANGUAGES: [(char, &str, &str); 9] = [
    ('a', "en-us", "American English"),
    ('b', "en-gb", "British English"),
    ('e', "es", "Spanish"),
    ('f', "fr-fr", "French"),
    ('h', "hi", "Hindi"),
    ('i', "it", "Italian"),
    ('j', "ja", "Japanese"),
    ('p', "pt-br", "Brazilian Portuguese"),
    ('z', "cmn", "Mandarin Chinese"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    code: char,
    espeak: &'static str,
    name: &'static str,
}

impl Language {
    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        LANGUAGES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|&(code, espeak, name)| Language { code, espeak, name })
    }

    /// `af_heart` → American English. Blends use the first voice.
    pub fn from_voice(voice: &str) -> Option<Self> {
        voice.trim().chars().next().and_then(Self::from_code)
    }

    /// `--force_lang` wins over the voice prefix.
    pub fn resolve(voice: &str, force: Option<&str>) -> Result<Self, ConfigError> {
        match force {
            Some(forced) => Self::parse(forced),
            None => Self::from_voice(voice)
                .ok_or_else(|| ConfigError::UnknownLanguage(voice.to_string())),
        }
    }

    /// Accepts a Kokoro letter (`b`) or an espeak id (`en-gb`).
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        let mut chars = value.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(lang) = Self::from_code(c) {
                return Ok(lang);
            }
        }
        LANGUAGES
            .iter()
            .find(|(_, espeak, _)| espeak.eq_ignore_ascii_case(value))
            .map(|&(code, espeak, name)| Language { code, espeak, name })
            .ok_or_else(|| ConfigError::UnknownLanguage(value.to_string()))
    }

    pub fn code(&self) -> char {
        self.code
    }

    pub fn espeak(&self) -> &'static str {
        self.espeak
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
