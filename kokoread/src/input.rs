//! Works out what to read and what to call the output.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::InputError;

pub const DEFAULT_INPUT_FILE: &str = "demo/tongue-twister.txt";

const TEXT_LABEL: &str = "chat";
const CLIPBOARD_LABEL: &str = "copied";

/// The input-related flags, before resolution.
#[derive(Debug, Clone)]
pub struct InputRequest {
    pub text: Option<String>,
    pub clipboard: bool,
    pub input_file: PathBuf,
    pub title: Option<String>,
}

impl Default for InputRequest {
    fn default() -> Self {
        Self {
            text: None,
            clipboard: false,
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            title: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Argument,
    Clipboard,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub text: String,
    /// Already sanitized.
    pub label: String,
    pub source: InputSource,
}

pub trait ClipboardReader {
    fn read_text(&mut self) -> Result<String, InputError>;
}

/// The desktop clipboard. An empty (or non-text) clipboard reads as "".
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardReader for SystemClipboard {
    fn read_text(&mut self) -> Result<String, InputError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| InputError::Clipboard(e.to_string()))?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(InputError::Clipboard(e.to_string())),
        }
    }
}

/// Positional text beats the clipboard, the clipboard beats the input file.
/// A non-empty title always replaces the derived label, whitespace included.
pub fn resolve_input(
    request: &InputRequest,
    clipboard: &mut impl ClipboardReader,
) -> Result<ResolvedInput, InputError> {
    let (text, label, source) = match request.text.as_deref().filter(|t| !t.is_empty()) {
        Some(text) => (text.to_string(), TEXT_LABEL.to_string(), InputSource::Argument),
        None if request.clipboard => {
            tracing::info!("using copied text as input");
            let text = clipboard.read_text()?;
            if text.trim().is_empty() {
                tracing::warn!("clipboard is empty");
            }
            (text, CLIPBOARD_LABEL.to_string(), InputSource::Clipboard)
        }
        None => {
            let path = &request.input_file;
            let text = fs::read_to_string(path).map_err(|source| InputError::ReadFile {
                path: path.clone(),
                source,
            })?;
            (text, file_label(path), InputSource::File(path.clone()))
        }
    };

    let label = match request.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => label,
    };

    tracing::debug!(?source, label = %label, chars = text.chars().count(), "resolved input");

    Ok(ResolvedInput {
        text,
        label: sanitize_label(&label),
        source,
    })
}

/// File name with its last extension removed.
fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Makes a label safe to use as a directory and file name prefix.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}
