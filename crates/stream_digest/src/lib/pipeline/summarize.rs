use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::{
    error::PipelineError,
    llm::generator::{GenerationRequest, Generator, ResponseFormat},
    pipeline::{builder::PipelineConfig, Stage},
    types::{Chunk, ChunkResult},
};

const CHUNK_SYSTEM_PROMPT: &str = include_str!("./prompts/chunk_system.txt");

fn chunk_prompt(chunk: &Chunk, total: usize) -> String {
    format!(
        "Transcript part {} of {}:\n\n{}",
        chunk.index + 1,
        total,
        chunk.text
    )
}

/// Summarizes a single chunk. Never fails: every error is folded into a
/// [`ChunkResult`] with `Failed` status.
#[tracing::instrument(skip_all, fields(index = chunk.index, words = chunk.word_count))]
async fn summarize_chunk<G>(
    chunk: Chunk,
    total: usize,
    generator: &G,
    config: &PipelineConfig,
) -> ChunkResult
where
    G: Generator + Sync,
{
    let request = GenerationRequest {
        model: config.model.clone(),
        system_prompt: CHUNK_SYSTEM_PROMPT.into(),
        user_prompt: chunk_prompt(&chunk, total),
        temperature: config.chunk_temperature,
        response_format: ResponseFormat::Text,
    };

    match tokio::time::timeout(config.request_timeout, generator.generate(request)).await {
        Err(_) => {
            tracing::warn!(timeout = ?config.request_timeout, "Chunk summarization timed out");
            ChunkResult::failed(chunk.index, "timeout")
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Chunk summarization failed");
            ChunkResult::failed(chunk.index, e.to_string())
        }
        Ok(Ok(summary)) if summary.trim().is_empty() => {
            tracing::warn!("Chunk summarization returned an empty response");
            ChunkResult::failed(chunk.index, "empty response")
        }
        Ok(Ok(summary)) => ChunkResult::ok(chunk.index, summary.trim()),
    }
}

/// Summarizes all chunks with at most `config.concurrency_limit` calls in
/// flight. Results come back sorted by chunk index.
///
/// Cancellation drops every in-flight call and schedules no new ones.
#[tracing::instrument(skip_all, fields(chunks = chunks.len()))]
pub async fn summarize_all<G>(
    chunks: Vec<Chunk>,
    generator: &G,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<Vec<ChunkResult>, PipelineError>
where
    G: Generator + Sync,
{
    let total = chunks.len();

    let calls = futures::stream::iter(chunks)
        .map(|chunk| summarize_chunk(chunk, total, generator, config))
        .buffer_unordered(config.concurrency_limit.get())
        .collect::<Vec<_>>();

    let mut results = cancel
        .run_until_cancelled(calls)
        .await
        .ok_or(PipelineError::Cancelled {
            stage: Stage::Summarizing,
        })?;

    // completion order is arbitrary
    results.sort_by_key(|r| r.index);

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(total, failed, "Chunk summarization finished");

    Ok(results)
}
