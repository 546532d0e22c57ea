use std::num::NonZeroUsize;

use crate::types::Chunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cannot chunk input without any words")]
pub struct EmptyInputError;

/// Chunks produced from a transcript, plus what was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunks: Vec<Chunk>,
    pub total_words: usize,
    /// Trailing words were dropped to stay within `max_units`
    pub truncated: bool,
}

impl ChunkPlan {
    pub fn covered_words(&self) -> usize {
        self.chunks.iter().map(|c| c.word_count).sum()
    }
}

/// Splits `text` on whitespace into windows of `unit_size` words.
///
/// At most `max_units` chunks are emitted; anything past that is dropped and
/// reported through [`ChunkPlan::truncated`].
pub fn chunk(
    text: &str,
    unit_size: NonZeroUsize,
    max_units: NonZeroUsize,
) -> Result<ChunkPlan, EmptyInputError> {
    let words = text.split_whitespace().collect::<Vec<_>>();
    if words.is_empty() {
        return Err(EmptyInputError);
    }

    let chunks = words
        .chunks(unit_size.get())
        .take(max_units.get())
        .enumerate()
        .map(|(index, window)| Chunk {
            index,
            text: window.join(" "),
            word_count: window.len(),
        })
        .collect::<Vec<_>>();

    let mut plan = ChunkPlan {
        chunks,
        total_words: words.len(),
        truncated: false,
    };
    plan.truncated = plan.covered_words() < plan.total_words;

    Ok(plan)
}
