use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use ndarray::Array3;
use ndarray_npy::NpzReader;

use crate::error::TtsError;

pub const STYLE_DIM: usize = 256;

/// Style vectors for every voice in a `voices-v1.0.bin` archive.
///
/// Each voice holds one row per possible token count; longer inputs use
/// later rows.
pub struct VoicePacks {
    styles: HashMap<String, Vec<[f32; STYLE_DIM]>>,
}

impl VoicePacks {
    pub fn load(path: &Path) -> Result<Self, TtsError> {
        let voices_err = |message: String| TtsError::Voices {
            path: path.to_path_buf(),
            message,
        };

        let mut npz = NpzReader::new(File::open(path)?).map_err(|e| voices_err(e.to_string()))?;
        let names = npz.names().map_err(|e| voices_err(e.to_string()))?;

        let mut styles = HashMap::new();
        for name in names {
            let data: Array3<f32> = npz
                .by_name(&name)
                .map_err(|e| voices_err(format!("{name}: {e}")))?;
            let rows = data
                .outer_iter()
                .map(|row| {
                    let mut style = [0.0; STYLE_DIM];
                    for (slot, value) in style.iter_mut().zip(row.iter()) {
                        *slot = *value;
                    }
                    style
                })
                .collect();
            let voice = name.strip_suffix(".npy").unwrap_or(&name).to_string();
            styles.insert(voice, rows);
        }

        let pack = Self { styles };
        tracing::debug!("voice styles loaded: {:?}", pack.names());
        Ok(pack)
    }

    pub fn from_styles(styles: HashMap<String, Vec<[f32; STYLE_DIM]>>) -> Self {
        Self { styles }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks a plain voice id or a mix such as `af_sarah.4+af_nicole.6`.
    pub fn validate(&self, voice: &str) -> Result<(), TtsError> {
        for (name, _) in parse_voice(voice)? {
            if !self.styles.contains_key(name) {
                return Err(TtsError::UnknownVoice(name.to_string()));
            }
        }
        Ok(())
    }

    /// The style vector for `voice` when synthesizing `token_count` tokens.
    pub fn style(&self, voice: &str, token_count: usize) -> Result<Vec<f32>, TtsError> {
        let mut blended = vec![0.0; STYLE_DIM];
        for (name, weight) in parse_voice(voice)? {
            let rows = self
                .styles
                .get(name)
                .ok_or_else(|| TtsError::UnknownVoice(name.to_string()))?;
            let Some(last) = rows.len().checked_sub(1) else {
                return Err(TtsError::UnknownVoice(name.to_string()));
            };
            let row = &rows[token_count.saturating_sub(1).min(last)];
            for (acc, value) in blended.iter_mut().zip(row.iter()) {
                *acc += value * weight;
            }
        }
        Ok(blended)
    }
}

/// `af_sarah.4+af_nicole.6` → `[("af_sarah", 0.4), ("af_nicole", 0.6)]`,
/// a plain id gets weight 1.
fn parse_voice(voice: &str) -> Result<Vec<(&str, f32)>, TtsError> {
    if !voice.contains('+') {
        return Ok(vec![(voice, 1.0)]);
    }
    voice
        .split('+')
        .map(|part| {
            let (name, portion) = part
                .split_once('.')
                .ok_or_else(|| TtsError::VoiceMix(voice.to_string()))?;
            let portion: f32 = portion
                .parse()
                .map_err(|_| TtsError::VoiceMix(voice.to_string()))?;
            Ok((name, portion * 0.1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packs() -> VoicePacks {
        let mut styles = HashMap::new();
        styles.insert(
            "af_heart".to_string(),
            vec![[1.0; STYLE_DIM], [2.0; STYLE_DIM], [3.0; STYLE_DIM]],
        );
        styles.insert("bf_emma".to_string(), vec![[10.0; STYLE_DIM]; 3]);
        VoicePacks::from_styles(styles)
    }

    #[test]
    fn style_row_follows_token_count() {
        let packs = packs();
        assert_eq!(packs.style("af_heart", 1).unwrap()[0], 1.0);
        assert_eq!(packs.style("af_heart", 2).unwrap()[0], 2.0);
        // past the end of the pack the last row is reused
        assert_eq!(packs.style("af_heart", 40).unwrap()[0], 3.0);
        assert_eq!(packs.style("af_heart", 0).unwrap()[0], 1.0);
    }

    #[test]
    fn mixes_are_weighted_sums() {
        let packs = packs();
        let style = packs.style("af_heart.5+bf_emma.5", 1).unwrap();
        assert!((style[0] - 5.5).abs() < 1e-5);
        assert_eq!(style.len(), STYLE_DIM);
    }

    #[test]
    fn unknown_and_malformed_voices() {
        let packs = packs();
        assert!(matches!(
            packs.validate("am_adam"),
            Err(TtsError::UnknownVoice(v)) if v == "am_adam"
        ));
        assert!(matches!(
            packs.validate("af_heart.5+am_adam.5"),
            Err(TtsError::UnknownVoice(v)) if v == "am_adam"
        ));
        assert!(matches!(
            packs.validate("af_heart+bf_emma"),
            Err(TtsError::VoiceMix(_))
        ));
        assert!(packs.validate("af_heart").is_ok());
    }

    #[test]
    fn names_are_sorted() {
        assert_eq!(packs().names(), vec!["af_heart", "bf_emma"]);
    }
}
