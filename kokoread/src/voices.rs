//! Short voice aliases and what to do with names that are not aliases.
//!
//! See <https://huggingface.co/hexgrad/Kokoro-82M/blob/main/VOICES.md> for the
//! voices the model ships with.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::lang::Language;

pub const DEFAULT_ALIAS: &str = "pro";

const BUILTIN_ALIASES: [(&str, &str); 4] = [
    ("pro", "af_heart"),
    ("hot", "af_bella"),
    ("asmr", "af_nicole"),
    ("brit", "bf_emma"),
];

/// How `--voice` values that are not a known alias are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownVoicePolicy {
    /// Pass the value through as a model voice id (e.g. `am_michael`).
    #[default]
    Literal,
    /// Ignore the value and use the default alias.
    Default,
}

impl FromStr for UnknownVoicePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "default" => Ok(Self::Default),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for UnknownVoicePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("literal"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// Immutable alias → voice id table, built once at startup.
#[derive(Debug, Clone)]
pub struct VoiceAliases {
    table: BTreeMap<String, String>,
}

impl Default for VoiceAliases {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VoiceAliases {
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES)
    }

    pub fn from_pairs<I, A, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, V)>,
        A: Into<String>,
        V: Into<String>,
    {
        let table = pairs
            .into_iter()
            .map(|(alias, voice)| (alias.into(), voice.into()))
            .collect();
        Self { table }
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.table.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(a, v)| (a.as_str(), v.as_str()))
    }

    /// Turns a `--voice` value into a model voice id.
    ///
    /// `None` selects the default alias. Known aliases map through the table,
    /// anything else follows `policy`. The result is never empty.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        policy: UnknownVoicePolicy,
    ) -> Result<String, ConfigError> {
        let requested = match requested {
            None => return self.default_voice(),
            Some(v) => v.trim(),
        };
        if requested.is_empty() {
            return Err(ConfigError::EmptyVoice);
        }

        if let Some(voice) = self.get(requested) {
            return Ok(voice.to_string());
        }

        match policy {
            UnknownVoicePolicy::Literal => Ok(requested.to_string()),
            UnknownVoicePolicy::Default => {
                tracing::warn!("unknown voice '{requested}', using '{DEFAULT_ALIAS}'");
                self.default_voice()
            }
        }
    }

    /// Language for a resolved voice. Without `force_lang`, a voice id whose
    /// first letter is not a Kokoro language is reported as an unknown voice.
    pub fn language_for(
        &self,
        voice: &str,
        force_lang: Option<&str>,
    ) -> Result<Language, ConfigError> {
        if force_lang.is_none() && Language::from_voice(voice).is_none() {
            let aliases: Vec<&str> = self.iter().map(|(alias, _)| alias).collect();
            return Err(ConfigError::UnknownVoice {
                voice: voice.to_string(),
                aliases: aliases.join(", "),
            });
        }
        Language::resolve(voice, force_lang)
    }

    fn default_voice(&self) -> Result<String, ConfigError> {
        self.get(DEFAULT_ALIAS)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingDefaultAlias(DEFAULT_ALIAS.to_string()))
    }
}
