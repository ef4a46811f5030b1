use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use espeak_rs::text_to_phonemes;

use crate::device::Device;
use crate::error::TtsError;
use crate::lang::Language;
use crate::onn::ort_base::OrtBase;
use crate::onn::ort_koko::OrtKoko;
use crate::tts::split::SplitPattern;
use crate::tts::tokenize::{chunk_phonemes, retain_known, tokenize, MAX_TOKENS};
use crate::tts::voice_pack::VoicePacks;
use crate::tts::{AudioChunk, Chunks, SpeechPipeline};
use crate::utils::fileio::ensure_file;

pub const DEFAULT_MODEL_PATH: &str = "checkpoints/kokoro-v1.0.onnx";
pub const DEFAULT_VOICES_PATH: &str = "data/voices-v1.0.bin";

/// Where the model files come from when they are not on disk yet.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub model_url: String,
    pub voices_url: String,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self {
            model_url: "https://github.com/thewh1teagle/kokoro-onnx/releases/download/model-files-v1.0/kokoro-v1.0.onnx".into(),
            voices_url: "https://github.com/thewh1teagle/kokoro-onnx/releases/download/model-files-v1.0/voices-v1.0.bin".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KokoroOptions {
    pub model_path: PathBuf,
    pub voices_path: PathBuf,
    pub source: ModelSource,
    pub device: Device,
    pub language: Language,
    pub speed: f32,
}

impl KokoroOptions {
    pub fn new(device: Device, language: Language) -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            voices_path: PathBuf::from(DEFAULT_VOICES_PATH),
            source: ModelSource::default(),
            device,
            language,
            speed: 1.0,
        }
    }
}

/// Kokoro-82M through ONNX Runtime, phonemized with espeak-ng.
pub struct KokoroPipeline {
    model: OrtKoko,
    voices: VoicePacks,
    language: Language,
    speed: f32,
}

impl KokoroPipeline {
    /// Loads (downloading if needed) the model and voices. Done once per run.
    pub fn new(opts: KokoroOptions) -> Result<Self, TtsError> {
        ensure_file(&opts.source.model_url, &opts.model_path)?;
        ensure_file(&opts.source.voices_url, &opts.voices_path)?;

        let start = Instant::now();
        let model = OrtKoko::new(&opts.model_path, opts.device)?;
        model.print_info();
        let voices = VoicePacks::load(&opts.voices_path)?;
        tracing::info!(
            device = %opts.device,
            language = opts.language.name(),
            "model loaded in {:.2}s",
            start.elapsed().as_secs_f32()
        );

        Ok(Self {
            model,
            voices,
            language: opts.language,
            speed: opts.speed,
        })
    }

    /// Voice ids in the loaded voices file, sorted.
    pub fn voices(&self) -> Vec<&str> {
        self.voices.names()
    }
}

/// The two model steps behind [`KokoroChunks`].
trait ChunkModel {
    fn phonemize(&self, text: &str) -> Result<String, TtsError>;

    fn synthesize(
        &self,
        graphemes: &str,
        piece: usize,
        phonemes: String,
        voice: &str,
    ) -> Result<AudioChunk, TtsError>;
}

impl ChunkModel for KokoroPipeline {
    fn phonemize(&self, text: &str) -> Result<String, TtsError> {
        let phonemes = text_to_phonemes(text, self.language.espeak(), None, true, false)
            .map_err(|e| TtsError::Phonemize {
                text: text.to_string(),
                message: format!("{e:?}"),
            })?
            .join("");
        Ok(retain_known(&normalize_phonemes(&phonemes)))
    }

    fn synthesize(
        &self,
        graphemes: &str,
        piece: usize,
        phonemes: String,
        voice: &str,
    ) -> Result<AudioChunk, TtsError> {
        let tokens = tokenize(&phonemes);
        let style = self.voices.style(voice, tokens.len())?;
        let start = Instant::now();
        let samples = self.model.infer(&tokens, style, self.speed)?;

        let chunk = AudioChunk {
            graphemes: graphemes.to_string(),
            piece,
            phonemes,
            samples,
        };
        let audio_secs = chunk.duration_secs();
        let took = start.elapsed().as_secs_f32();
        tracing::debug!(
            "created {audio_secs:.2}s of audio for {} tokens in {took:.2}s ({:.2}x real-time)",
            tokens.len(),
            audio_secs / took.max(f32::EPSILON)
        );
        Ok(chunk)
    }
}

impl SpeechPipeline for KokoroPipeline {
    fn generate<'a>(
        &'a self,
        text: &'a str,
        voice: &str,
        split: &'a SplitPattern,
    ) -> Result<Chunks<'a>, TtsError> {
        self.voices.validate(voice)?;
        Ok(Box::new(KokoroChunks::new(
            self,
            voice,
            split.segments(text),
            MAX_TOKENS,
        )))
    }
}

/// Phonemizes one segment at a time and runs the model only when asked for
/// the next chunk.
struct KokoroChunks<'a, M> {
    model: &'a M,
    voice: String,
    max_tokens: usize,
    segments: VecDeque<&'a str>,
    /// Pieces of the current segment: `(segment, piece index, phonemes)`.
    pending: VecDeque<(&'a str, usize, String)>,
}

impl<'a, M: ChunkModel> KokoroChunks<'a, M> {
    fn new(model: &'a M, voice: &str, segments: Vec<&'a str>, max_tokens: usize) -> Self {
        Self {
            model,
            voice: voice.to_string(),
            max_tokens,
            segments: segments.into(),
            pending: VecDeque::new(),
        }
    }
}

impl<M: ChunkModel> Iterator for KokoroChunks<'_, M> {
    type Item = Result<AudioChunk, TtsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((graphemes, piece, phonemes)) = self.pending.pop_front() {
                return Some(self.model.synthesize(graphemes, piece, phonemes, &self.voice));
            }

            let segment = self.segments.pop_front()?;
            let phonemes = match self.model.phonemize(segment) {
                Ok(p) => p,
                Err(e) => return Some(Err(e)),
            };
            if phonemes.trim().is_empty() {
                tracing::debug!("no phonemes for {segment:?}, skipping");
                continue;
            }
            let pieces = chunk_phonemes(&phonemes, self.max_tokens);
            self.pending.extend(
                pieces
                    .into_iter()
                    .enumerate()
                    .map(|(piece, phonemes)| (segment, piece, phonemes)),
            );
        }
    }
}

/// espeak symbols that Kokoro spells differently.
fn normalize_phonemes(phonemes: &str) -> String {
    phonemes
        .replace("kəkˈoːɹoʊ", "kˈoʊkəɹoʊ")
        .replace("kəkˈɔːɹəʊ", "kˈəʊkəɹəʊ")
        .replace('ʲ', "j")
        .replace('r', "ɹ")
        .replace('x', "k")
        .replace('ɬ', "l")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Phonemes are the text itself, except for `silent`. Every call is logged.
    #[derive(Default)]
    struct EchoModel {
        calls: RefCell<Vec<String>>,
    }

    impl EchoModel {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl ChunkModel for EchoModel {
        fn phonemize(&self, text: &str) -> Result<String, TtsError> {
            self.calls.borrow_mut().push(format!("phonemize {text}"));
            if text == "silent" {
                return Ok(String::new());
            }
            Ok(text.to_string())
        }

        fn synthesize(
            &self,
            graphemes: &str,
            piece: usize,
            phonemes: String,
            voice: &str,
        ) -> Result<AudioChunk, TtsError> {
            self.calls.borrow_mut().push(format!("infer {phonemes}"));
            if voice == "broken" {
                return Err(TtsError::UnknownVoice(voice.to_string()));
            }
            Ok(AudioChunk {
                graphemes: graphemes.to_string(),
                piece,
                samples: vec![0.0; phonemes.len()],
                phonemes,
            })
        }
    }

    #[test]
    fn segments_without_phonemes_yield_nothing() {
        let model = EchoModel::default();
        let chunks: Vec<AudioChunk> =
            KokoroChunks::new(&model, "af_heart", vec!["one", "silent", "two"], MAX_TOKENS)
                .collect::<Result<_, _>>()
                .unwrap();

        let graphemes: Vec<&str> = chunks.iter().map(|c| c.graphemes.as_str()).collect();
        assert_eq!(graphemes, vec!["one", "two"]);
        assert!(!model.calls().contains(&"infer ".to_string()));
    }

    #[test]
    fn long_segments_become_ordered_pieces() {
        let model = EchoModel::default();
        let chunks: Vec<AudioChunk> =
            KokoroChunks::new(&model, "af_heart", vec!["ab cd ef", "gh"], 5)
                .collect::<Result<_, _>>()
                .unwrap();

        let pieces: Vec<(&str, usize, &str)> = chunks
            .iter()
            .map(|c| (c.graphemes.as_str(), c.piece, c.phonemes.as_str()))
            .collect();
        assert_eq!(
            pieces,
            vec![("ab cd ef", 0, "ab"), ("ab cd ef", 1, "cd ef"), ("gh", 0, "gh")]
        );
    }

    #[test]
    fn inference_runs_once_per_next() {
        let model = EchoModel::default();
        let mut chunks = KokoroChunks::new(&model, "af_heart", vec!["ab cd ef", "gh"], 5);
        assert!(model.calls().is_empty());

        chunks.next().unwrap().unwrap();
        assert_eq!(model.calls(), vec!["phonemize ab cd ef", "infer ab"]);

        chunks.next().unwrap().unwrap();
        assert_eq!(
            model.calls(),
            vec!["phonemize ab cd ef", "infer ab", "infer cd ef"]
        );

        chunks.next().unwrap().unwrap();
        assert_eq!(model.calls().len(), 5);
        assert!(chunks.next().is_none());
        assert_eq!(model.calls().len(), 5);
    }

    #[test]
    fn model_errors_are_yielded() {
        let model = EchoModel::default();
        let mut chunks = KokoroChunks::new(&model, "broken", vec!["one"], MAX_TOKENS);
        assert!(matches!(chunks.next(), Some(Err(TtsError::UnknownVoice(_)))));
    }

    #[test]
    fn normalizes_espeak_symbols() {
        assert_eq!(normalize_phonemes("ræx"), "ɹæk");
        assert_eq!(normalize_phonemes("mʲɬ"), "mjl");
        assert_eq!(normalize_phonemes("kəkˈoːɹoʊ"), "kˈoʊkəɹoʊ");
    }

    #[test]
    fn default_paths_and_urls() {
        let opts = KokoroOptions::new(Device::Cpu, Language::from_code('a').unwrap());
        assert_eq!(opts.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(opts.voices_path, PathBuf::from(DEFAULT_VOICES_PATH));
        assert!(opts.source.model_url.ends_with("kokoro-v1.0.onnx"));
        assert!(opts.source.voices_url.ends_with("voices-v1.0.bin"));
        assert_eq!(opts.speed, 1.0);
    }
}
