use crate::tts::vocab::VOCAB;

pub const PAD_TOKEN: i64 = 0;

/// Longest token sequence the model accepts, padding excluded.
pub const MAX_TOKENS: usize = 510;

/// Maps phonemes to token ids, dropping symbols the model does not know.
pub fn tokenize(phonemes: &str) -> Vec<i64> {
    phonemes.chars().filter_map(|c| VOCAB.get(&c).copied()).collect()
}

/// Only the symbols [`tokenize`] keeps.
pub fn retain_known(phonemes: &str) -> String {
    phonemes.chars().filter(|c| VOCAB.contains_key(c)).collect()
}

/// `[0, *tokens, 0]`
pub fn pad(tokens: &[i64]) -> Vec<i64> {
    let mut padded = Vec::with_capacity(tokens.len() + 2);
    padded.push(PAD_TOKEN);
    padded.extend_from_slice(tokens);
    padded.push(PAD_TOKEN);
    padded
}

/// Cuts a phoneme string into pieces of at most `max` symbols, preferring
/// to cut after punctuation, then at a space.
pub fn chunk_phonemes(phonemes: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest: Vec<char> = phonemes.trim().chars().collect();

    while rest.len() > max {
        let window = &rest[..max];
        let cut = window
            .iter()
            .rposition(|c| matches!(c, '.' | '!' | '?' | ';' | ':' | ','))
            .map(|i| i + 1)
            .or_else(|| window.iter().rposition(|c| *c == ' '))
            .filter(|&i| i > 0)
            .unwrap_or(max);
        let head: String = rest.drain(..cut).collect();
        let head = head.trim();
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        while rest.first() == Some(&' ') {
            rest.remove(0);
        }
    }

    let tail: String = rest.into_iter().collect();
    if !tail.trim().is_empty() {
        chunks.push(tail.trim().to_string());
    }
    chunks
}
