//! Plays the generated files one after another.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::PlaybackError;
use crate::synth::OutputFiles;
use crate::utils::wav::wav_duration;

/// Time given to the player to read the file header before asking for the
/// duration.
pub const METADATA_WAIT: Duration = Duration::from_millis(100);

/// Number of sleeps the wait for one file is divided into.
pub const PROGRESS_STEPS: u32 = 100;

/// Something that can start playing an audio file.
pub trait MediaPlayer {
    type Playing: Playback;

    fn start(&self, path: &Path) -> Result<Self::Playing, PlaybackError>;
}

/// A file that is currently playing. Playback stops when this is dropped.
pub trait Playback {
    fn duration(&self) -> Option<Duration>;
}

/// The default audio output device via rodio.
pub struct RodioPlayer {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioPlayer {
    pub fn new() -> Result<Self, PlaybackError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::NoDevice(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

pub struct RodioPlayback {
    _sink: Sink,
    duration: Option<Duration>,
}

impl Playback for RodioPlayback {
    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl MediaPlayer for RodioPlayer {
    type Playing = RodioPlayback;

    fn start(&self, path: &Path) -> Result<RodioPlayback, PlaybackError> {
        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let duration = source
            .total_duration()
            .or_else(|| wav_duration(path).ok());

        let sink =
            Sink::try_new(&self.handle).map_err(|e| PlaybackError::NoDevice(e.to_string()))?;
        sink.append(source);

        Ok(RodioPlayback {
            _sink: sink,
            duration,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub files: usize,
    pub duration: Duration,
}

/// Plays files strictly in order, waiting out each file's duration before
/// starting the next one.
pub struct PlaybackScheduler<P, S = fn(Duration)> {
    player: P,
    sleep: S,
    show_progress: bool,
}

impl<P: MediaPlayer> PlaybackScheduler<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            sleep: std::thread::sleep,
            show_progress: true,
        }
    }
}

impl<P: MediaPlayer, S: FnMut(Duration)> PlaybackScheduler<P, S> {
    /// Replaces the function used to wait.
    pub fn with_sleep<T: FnMut(Duration)>(self, sleep: T) -> PlaybackScheduler<P, T> {
        PlaybackScheduler {
            player: self.player,
            sleep,
            show_progress: self.show_progress,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn play_all(&mut self, files: &OutputFiles) -> Result<PlaybackSummary, PlaybackError> {
        tracing::info!("playing {} files", files.len());
        let total = files.len();
        let mut played = Duration::ZERO;

        for (i, path) in files.iter().enumerate() {
            let full_path = fs::canonicalize(path).map_err(|source| PlaybackError::Open {
                path: path.clone(),
                source,
            })?;
            let playing = self.player.start(&full_path)?;
            (self.sleep)(METADATA_WAIT);

            let duration = playing
                .duration()
                .ok_or_else(|| PlaybackError::UnknownDuration(full_path.clone()))?;
            tracing::debug!("playing {} ({:.2}s)", full_path.display(), duration.as_secs_f32());

            let pb = self.progress_bar(progress_prefix(i, total));
            let step = duration / PROGRESS_STEPS;
            for _ in 0..PROGRESS_STEPS {
                (self.sleep)(step);
                pb.inc(1);
            }
            pb.finish();

            drop(playing);
            played += duration;
        }

        Ok(PlaybackSummary {
            files: total,
            duration: played,
        })
    }

    fn progress_bar(&self, prefix: String) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{prefix}{elapsed} {bar:40.yellow} {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let pb = ProgressBar::new(u64::from(PROGRESS_STEPS));
        pb.set_style(style);
        pb.set_prefix(prefix);
        pb
    }
}

/// `▶ 2/5 ` when there are several files, `▶ ` otherwise.
fn progress_prefix(index: usize, total: usize) -> String {
    if total > 1 {
        format!("\u{25B6} {}/{} ", index + 1, total)
    } else {
        "\u{25B6} ".to_string()
    }
}

/// `outputs/label/*` for messages that send the user to the files.
pub fn output_glob(dir: &Path) -> PathBuf {
    dir.join("*")
}

pub fn playback_failed_message(dir: &Path, err: &PlaybackError) -> String {
    format!(
        "Something went wrong when trying to play the audio ({err}). Play the output files manually: {}",
        output_glob(dir).display()
    )
}

pub fn playback_skipped_message(dir: &Path) -> String {
    format!("Audio player disabled: {}", output_glob(dir).display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_shows_position_only_for_several_files() {
        assert_eq!(progress_prefix(0, 1), "▶ ");
        assert_eq!(progress_prefix(1, 3), "▶ 2/3 ");
    }

    #[test]
    fn messages_point_at_the_output_directory() {
        let dir = Path::new("outputs").join("chat");
        let err = PlaybackError::NoDevice("no default output".into());
        let msg = playback_failed_message(&dir, &err);
        assert!(msg.contains(&output_glob(&dir).display().to_string()));
        assert!(msg.contains("no default output"));

        let msg = playback_skipped_message(&dir);
        assert!(msg.starts_with("Audio player disabled: "));
        assert!(msg.ends_with(&output_glob(&dir).display().to_string()));
    }
}
