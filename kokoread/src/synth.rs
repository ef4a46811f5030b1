//! Turns the pipeline's chunks into numbered WAV files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::error::SynthError;
use crate::tts::SpeechPipeline;
use crate::utils::wav::write_wav;

/// Written files in generation order; index `i` is chunk `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFiles {
    paths: Vec<PathBuf>,
}

impl OutputFiles {
    fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    /// Directory holding the files, taken from the first one.
    pub fn directory(&self) -> Option<&Path> {
        self.paths.first().and_then(|p| p.parent())
    }
}

impl From<Vec<PathBuf>> for OutputFiles {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl<'a> IntoIterator for &'a OutputFiles {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisReport {
    pub files: OutputFiles,
    /// Total length of the generated audio.
    pub audio_secs: f32,
    pub elapsed: Duration,
}

impl SynthesisReport {
    pub fn chunks(&self) -> usize {
        self.files.len()
    }
}

/// Generates every chunk for `config` and writes each one as soon as it
/// arrives. The first pipeline or write error ends the run.
pub fn synthesize(
    pipeline: &impl SpeechPipeline,
    config: &RunConfig,
) -> Result<SynthesisReport, SynthError> {
    let start = Instant::now();
    let sample_rate = pipeline.sample_rate();
    let mut files = OutputFiles::default();
    let mut audio_secs = 0.0;

    let chunks = pipeline.generate(config.text(), config.voice(), config.split_pattern())?;
    for (index, chunk) in chunks.enumerate() {
        let chunk = chunk?;
        let path = config.chunk_path(index);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SynthError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        write_wav(&path, &chunk.samples, sample_rate).map_err(|source| SynthError::Write {
            path: path.clone(),
            source,
        })?;

        audio_secs += chunk.samples.len() as f32 / sample_rate as f32;
        tracing::debug!(
            index,
            piece = chunk.piece,
            text = %chunk.graphemes,
            phonemes = %chunk.phonemes,
            "wrote {}",
            path.display()
        );
        files.push(path);
    }

    let elapsed = start.elapsed();
    tracing::info!(
        "{} chunks ({audio_secs:.2}s of audio) generated in {:.2}s",
        files.len(),
        elapsed.as_secs_f32()
    );

    Ok(SynthesisReport {
        files,
        audio_secs,
        elapsed,
    })
}
