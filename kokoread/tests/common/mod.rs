#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use kokoread::error::{PlaybackError, TtsError};
use kokoread::input::{InputSource, ResolvedInput};
use kokoread::lang::Language;
use kokoread::playback::{MediaPlayer, Playback};
use kokoread::tts::split::SplitPattern;
use kokoread::tts::{AudioChunk, Chunks, SpeechPipeline};
use kokoread::utils::wav::wav_duration;
use kokoread::{Device, RunConfig};

/// One chunk per split segment; chunk `i` is `(i + 1) * 0.1s` long.
#[derive(Default)]
pub struct ScriptedPipeline {
    pub fail_at: Option<usize>,
}

pub const SAMPLES_PER_STEP: usize = 2_400;

impl SpeechPipeline for ScriptedPipeline {
    fn generate<'a>(
        &'a self,
        text: &'a str,
        voice: &str,
        split: &'a SplitPattern,
    ) -> Result<Chunks<'a>, TtsError> {
        if voice != "af_heart" && voice != "bf_emma" {
            return Err(TtsError::UnknownVoice(voice.to_string()));
        }
        let fail_at = self.fail_at;
        Ok(Box::new(split.segments(text).into_iter().enumerate().map(
            move |(i, segment)| {
                if Some(i) == fail_at {
                    return Err(TtsError::Phonemize {
                        text: segment.to_string(),
                        message: "scripted failure".into(),
                    });
                }
                Ok(AudioChunk {
                    graphemes: segment.to_string(),
                    piece: 0,
                    phonemes: String::new(),
                    samples: vec![0.1; SAMPLES_PER_STEP * (i + 1)],
                })
            },
        )))
    }
}

/// Reports each file's real length and remembers what it was asked to play.
#[derive(Clone, Default)]
pub struct RecordingPlayer {
    pub started: Rc<RefCell<Vec<PathBuf>>>,
    pub fail_on: Option<usize>,
}

pub struct RecordedPlayback(Option<Duration>);

impl Playback for RecordedPlayback {
    fn duration(&self) -> Option<Duration> {
        self.0
    }
}

impl MediaPlayer for RecordingPlayer {
    type Playing = RecordedPlayback;

    fn start(&self, path: &Path) -> Result<RecordedPlayback, PlaybackError> {
        let mut started = self.started.borrow_mut();
        if Some(started.len()) == self.fail_on {
            return Err(PlaybackError::NoDevice("scripted failure".into()));
        }
        started.push(path.to_path_buf());
        Ok(RecordedPlayback(wav_duration(path).ok()))
    }
}

/// Collects every requested sleep instead of sleeping.
#[derive(Clone, Default)]
pub struct SleepLog(pub Rc<RefCell<Vec<Duration>>>);

impl SleepLog {
    pub fn sleeper(&self) -> impl FnMut(Duration) {
        let log = self.0.clone();
        move |d| log.borrow_mut().push(d)
    }

    pub fn total(&self) -> Duration {
        self.0.borrow().iter().sum()
    }
}

pub fn config(text: &str, label: &str, root: &Path) -> RunConfig {
    let input = ResolvedInput {
        text: text.to_string(),
        label: label.to_string(),
        source: InputSource::Argument,
    };
    RunConfig::new(
        input,
        "af_heart",
        Language::from_voice("af_heart").unwrap(),
        Device::Cpu,
        SplitPattern::default(),
    )
    .with_output_root(root)
}
