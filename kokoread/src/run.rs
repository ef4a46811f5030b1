use std::time::Duration;

use crate::config::RunConfig;
use crate::error::{Error, PlaybackError};
use crate::playback::{MediaPlayer, PlaybackScheduler, PlaybackSummary};
use crate::synth::{synthesize, SynthesisReport};
use crate::tts::SpeechPipeline;

#[derive(Debug)]
pub enum PlaybackOutcome {
    Skipped,
    Completed(PlaybackSummary),
    /// The files are on disk; only playing them failed.
    Failed(PlaybackError),
}

#[derive(Debug)]
pub struct RunOutcome {
    pub synthesis: SynthesisReport,
    pub playback: PlaybackOutcome,
}

/// Synthesizes every chunk, then plays them unless playback is skipped.
///
/// Synthesis errors end the run. Opening the player and playing are folded
/// into [`PlaybackOutcome::Failed`], so the caller can still point the user
/// at the written files.
pub fn run<P, M, S, F>(pipeline: &P, config: &RunConfig, open_player: F) -> Result<RunOutcome, Error>
where
    P: SpeechPipeline,
    M: MediaPlayer,
    S: FnMut(Duration),
    F: FnOnce() -> Result<PlaybackScheduler<M, S>, PlaybackError>,
{
    let synthesis = synthesize(pipeline, config)?;
    if synthesis.files.is_empty() {
        return Err(Error::NothingGenerated);
    }

    let playback = if config.skip_play() {
        PlaybackOutcome::Skipped
    } else {
        match open_player().and_then(|mut scheduler| scheduler.play_all(&synthesis.files)) {
            Ok(summary) => PlaybackOutcome::Completed(summary),
            Err(e) => {
                tracing::warn!("playback failed: {e}");
                PlaybackOutcome::Failed(e)
            }
        }
    };

    Ok(RunOutcome {
        synthesis,
        playback,
    })
}
