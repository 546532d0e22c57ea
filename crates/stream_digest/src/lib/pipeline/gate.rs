use itertools::Itertools;

use crate::{
    error::PipelineError,
    types::{ChunkResult, ChunkSummary},
};

/// Keeps the successful, non-blank chunk summaries in index order.
///
/// This is the only place where partial failure escalates: with no usable
/// summary there is nothing to synthesize from.
pub fn gate(results: Vec<ChunkResult>) -> Result<Vec<ChunkSummary>, PipelineError> {
    let total = results.len();

    let summaries = results
        .into_iter()
        .filter(|r| r.is_ok() && !r.summary_text.trim().is_empty())
        .sorted_by_key(|r| r.index)
        .map(|r| ChunkSummary {
            index: r.index,
            text: r.summary_text,
        })
        .collect_vec();

    if summaries.is_empty() {
        tracing::error!(total, "No chunk produced a usable summary");
        return Err(PipelineError::AllChunksFailed { total });
    }

    Ok(summaries)
}
