use std::path::{Path, PathBuf};

use crate::device::Device;
use crate::input::ResolvedInput;
use crate::lang::Language;
use crate::tts::split::SplitPattern;

pub const DEFAULT_OUTPUT_ROOT: &str = "outputs";

/// Everything one run needs, resolved from the command line once.
///
/// Built with [`RunConfig::new`] and the `with_*` methods, then only read.
#[derive(Debug, Clone)]
pub struct RunConfig {
    text: String,
    label: String,
    voice: String,
    language: Language,
    device: Device,
    split_pattern: SplitPattern,
    output_root: PathBuf,
    speed: f32,
    skip_play: bool,
    verbose: bool,
}

impl RunConfig {
    pub fn new(
        input: ResolvedInput,
        voice: impl Into<String>,
        language: Language,
        device: Device,
        split_pattern: SplitPattern,
    ) -> Self {
        Self {
            text: input.text,
            label: input.label,
            voice: voice.into(),
            language,
            device,
            split_pattern,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            speed: 1.0,
            skip_play: false,
            verbose: false,
        }
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_skip_play(mut self, skip_play: bool) -> Self {
        self.skip_play = skip_play;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn split_pattern(&self) -> &SplitPattern {
        &self.split_pattern
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn skip_play(&self) -> bool {
        self.skip_play
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// `<output_root>/<label>`
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(&self.label)
    }

    /// `<output_root>/<label>/<label>-<voice>-<index>.wav`
    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.output_dir()
            .join(format!("{}-{}-{}.wav", self.label, self.voice, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSource;

    fn config(label: &str, voice: &str) -> RunConfig {
        let input = ResolvedInput {
            text: "text".into(),
            label: label.into(),
            source: InputSource::Argument,
        };
        RunConfig::new(
            input,
            voice,
            Language::from_voice(voice).unwrap(),
            Device::Cpu,
            SplitPattern::default(),
        )
    }

    #[test]
    fn chunk_paths_are_namespaced_by_label() {
        let cfg = config("tongue-twister", "af_heart");
        assert_eq!(
            cfg.chunk_path(0),
            Path::new("outputs/tongue-twister/tongue-twister-af_heart-0.wav")
        );
        assert_eq!(
            cfg.chunk_path(12),
            Path::new("outputs/tongue-twister/tongue-twister-af_heart-12.wav")
        );
    }

    #[test]
    fn output_root_can_be_moved() {
        let cfg = config("chat", "bf_emma").with_output_root("/tmp/tts");
        assert_eq!(cfg.output_dir(), Path::new("/tmp/tts/chat"));
        assert_eq!(
            cfg.chunk_path(1),
            Path::new("/tmp/tts/chat/chat-bf_emma-1.wav")
        );
    }

    #[test]
    fn defaults() {
        let cfg = config("chat", "af_heart");
        assert_eq!(cfg.speed(), 1.0);
        assert!(!cfg.skip_play());
        assert!(!cfg.verbose());
        assert_eq!(cfg.language().espeak(), "en-us");
    }
}
