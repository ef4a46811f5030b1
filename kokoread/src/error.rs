use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while working out what text to read.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Invalid flag values and voice/language resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("voice must not be empty")]
    EmptyVoice,

    #[error("default voice alias '{0}' is missing from the alias table")]
    MissingDefaultAlias(String),

    #[error("unknown device '{0}', expected one of: cuda, mps, xpu, cpu")]
    UnknownDevice(String),

    #[error("unknown unknown-voice policy '{0}', expected 'literal' or 'default'")]
    UnknownPolicy(String),

    #[error("unknown voice '{voice}': use an alias ({aliases}) or a voice id such as af_heart")]
    UnknownVoice { voice: String, aliases: String },

    #[error("cannot derive a language from voice '{0}', pass --force_lang")]
    UnknownLanguage(String),

    #[error("invalid split pattern: {0}")]
    SplitPattern(#[from] regex::Error),
}

/// Errors raised by the speech model and its support files.
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("onnx runtime: {0}")]
    Ort(#[from] ort::Error),

    #[error("model session is not initialized")]
    SessionMissing,

    #[error("voice '{0}' not found in voices file")]
    UnknownVoice(String),

    #[error("malformed voice mix '{0}', expected e.g. af_sarah.4+af_nicole.6")]
    VoiceMix(String),

    #[error("failed to load voices from {path}: {message}")]
    Voices { path: PathBuf, message: String },

    #[error("phonemization failed for {text:?}: {message}")]
    Phonemize { text: String, message: String },

    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors from the synthesis stage. All of them end the run.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error(transparent)]
    Tts(#[from] TtsError),

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

/// Errors from the playback stage. The caller reports these and moves on.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("player reported no duration for {0}")]
    UnknownDuration(PathBuf),
}

/// Crate-level error for callers that drive every stage.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tts(#[from] TtsError),

    #[error(transparent)]
    Synth(#[from] SynthError),

    #[error("no audio was generated, the input text is empty")]
    NothingGenerated,
}
