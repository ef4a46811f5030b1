pub mod koko;
pub mod split;
pub mod tokenize;
pub mod vocab;
pub mod voice_pack;

use crate::error::TtsError;
use split::SplitPattern;

pub const SAMPLE_RATE: u32 = 24000;

/// One synthesized piece of the input text.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// The whole source segment, shared by every piece cut from it.
    pub graphemes: String,
    /// Position of this chunk among the pieces of its segment.
    pub piece: usize,
    pub phonemes: String,
    pub samples: Vec<f32>,
}

impl AudioChunk {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / SAMPLE_RATE as f32
    }
}

/// Ordered, finite, single-use sequence of chunks.
pub type Chunks<'a> = Box<dyn Iterator<Item = Result<AudioChunk, TtsError>> + 'a>;

/// A text-to-speech model seen from the outside: text in, chunks out.
pub trait SpeechPipeline {
    /// Splits `text` with `split` and lazily synthesizes each piece in `voice`.
    ///
    /// Fails early when the voice is unknown; per-chunk failures are yielded
    /// by the iterator.
    fn generate<'a>(
        &'a self,
        text: &'a str,
        voice: &str,
        split: &'a SplitPattern,
    ) -> Result<Chunks<'a>, TtsError>;

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
}
