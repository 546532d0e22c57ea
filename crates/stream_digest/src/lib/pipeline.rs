pub mod builder;
pub mod chunker;
pub mod fallback;
pub mod gate;
pub mod summarize;
pub mod synthesis;
pub mod validate;

use std::fmt;

use itertools::Itertools;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{FetchError, PipelineError},
    llm::generator::Generator,
    types::{ArticleOutcome, ArticleSource},
    yt::{MetadataProvider, TranscriptProvider},
};

use self::{
    builder::PipelineConfig, chunker::chunk, fallback::assemble_fallback, gate::gate,
    summarize::summarize_all, synthesis::synthesize, validate::validate,
};

/// Position of a request in the pipeline, used for logging and to report
/// where a cancellation was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Chunking,
    Summarizing,
    Gating,
    Synthesizing,
    Validating,
    FallingBack,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Chunking => "chunking",
            Stage::Summarizing => "summarizing",
            Stage::Gating => "gating",
            Stage::Synthesizing => "synthesizing",
            Stage::Validating => "validating",
            Stage::FallingBack => "falling_back",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

fn ensure_active(cancel: &CancellationToken, stage: Stage) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        tracing::warn!(%stage, "Cancellation observed, stopping pipeline");
        return Err(PipelineError::Cancelled { stage });
    }
    Ok(())
}

fn placeholder_title(video_id: &str) -> String {
    format!("Video {video_id}")
}

/// Turns a video transcript into a structured article.
///
/// Build one with [`builder::ArticlePipelineBuilder`]. Each call to
/// [`ArticlePipeline::produce_article`] is independent; the pipeline holds no
/// state between requests.
pub struct ArticlePipeline<T, M, G>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    G: Generator + Send + Sync + 'static,
{
    transcripts: T,
    metadata: M,
    generator: G,
    config: PipelineConfig,
}

impl<T, M, G> ArticlePipeline<T, M, G>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    G: Generator + Send + Sync + 'static,
{
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the whole pipeline for `video_id`.
    ///
    /// Returns either a schema-valid article or exactly one fatal error.
    /// Cancelling `cancel` aborts in-flight calls and yields
    /// [`PipelineError::Cancelled`].
    #[tracing::instrument(skip(self, cancel))]
    pub async fn produce_article(
        &self,
        video_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ArticleOutcome, PipelineError> {
        ensure_active(cancel, Stage::Idle)?;

        let (transcript, title) = self.fetch_sources(video_id, cancel).await?;
        self.compose(video_id, &title, &transcript, cancel).await
    }

    /// Fetches the transcript and title concurrently. A missing title is
    /// replaced by a placeholder; a missing transcript is fatal.
    #[tracing::instrument(skip(self, cancel))]
    async fn fetch_sources(
        &self,
        video_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(String, String), PipelineError> {
        tracing::info!(stage = %Stage::Fetching, "Fetching transcript and metadata");
        let timeout = self.config.request_timeout;

        let fetches = async {
            tokio::join!(
                tokio::time::timeout(timeout, self.transcripts.fetch_transcript(video_id)),
                tokio::time::timeout(timeout, self.metadata.fetch_title(video_id)),
            )
        };

        let (segments, title) =
            cancel
                .run_until_cancelled(fetches)
                .await
                .ok_or(PipelineError::Cancelled {
                    stage: Stage::Fetching,
                })?;

        let segments = segments
            .map_err(|_| FetchError::Timeout(timeout))
            .and_then(|r| r.map_err(Into::into))
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript"))?;

        let title = match title {
            Ok(Ok(title)) if !title.trim().is_empty() => title.trim().to_string(),
            Ok(Ok(_)) => {
                tracing::warn!("Video metadata has an empty title, using placeholder");
                placeholder_title(video_id)
            }
            Ok(Err(e)) => {
                let e: FetchError = e.into();
                tracing::warn!(error = %e, "Failed to fetch video metadata, using placeholder");
                placeholder_title(video_id)
            }
            Err(_) => {
                tracing::warn!(?timeout, "Video metadata request timed out, using placeholder");
                placeholder_title(video_id)
            }
        };

        let transcript = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|text| !text.is_empty())
            .join(" ");

        if transcript.trim().is_empty() {
            tracing::error!(segments = segments.len(), "Transcript is empty");
            return Err(PipelineError::EmptyTranscript {
                video_id: video_id.to_string(),
            });
        }

        Ok((transcript, title))
    }

    /// Chunk, summarize, gate, synthesize and validate
    #[tracing::instrument(skip(self, transcript, cancel))]
    async fn compose(
        &self,
        video_id: &str,
        title: &str,
        transcript: &str,
        cancel: &CancellationToken,
    ) -> Result<ArticleOutcome, PipelineError> {
        ensure_active(cancel, Stage::Chunking)?;
        tracing::info!(stage = %Stage::Chunking, "Chunking transcript");

        let plan = chunk(transcript, self.config.unit_size, self.config.max_units).map_err(|_| {
            PipelineError::EmptyTranscript {
                video_id: video_id.to_string(),
            }
        })?;

        if plan.truncated {
            tracing::warn!(
                total_words = plan.total_words,
                covered_words = plan.covered_words(),
                max_units = self.config.max_units.get(),
                "Transcript exceeds chunk limit, trailing content dropped"
            );
        }

        let truncated = plan.truncated;
        let chunks = plan.chunks;
        let chunks_total = chunks.len();

        tracing::info!(stage = %Stage::Summarizing, chunks = chunks_total, "Summarizing chunks");
        let results = summarize_all(chunks, &self.generator, &self.config, cancel).await?;
        let chunks_failed = results.iter().filter(|r| !r.is_ok()).count();

        tracing::info!(stage = %Stage::Gating, chunks_failed, "Gating chunk results");
        let summaries = gate(results)?;

        ensure_active(cancel, Stage::Synthesizing)?;
        tracing::info!(stage = %Stage::Synthesizing, summaries = summaries.len(), "Synthesizing article");

        let raw = cancel
            .run_until_cancelled(synthesize(title, &summaries, &self.generator, &self.config))
            .await
            .ok_or(PipelineError::Cancelled {
                stage: Stage::Synthesizing,
            })??;

        tracing::info!(stage = %Stage::Validating, "Validating synthesized article");
        let (article, source) = match validate(&raw) {
            Ok(article) => (article, ArticleSource::Synthesized),
            Err(reason) => {
                tracing::warn!(
                    stage = %Stage::FallingBack,
                    %reason,
                    "Synthesized article is invalid, assembling fallback"
                );
                (assemble_fallback(title, &summaries), ArticleSource::Fallback)
            }
        };

        tracing::info!(
            stage = %Stage::Done,
            sections = article.sections.len(),
            ?source,
            truncated,
            "Article ready"
        );

        Ok(ArticleOutcome {
            article,
            source,
            truncated,
            chunks_total,
            chunks_failed,
        })
    }
}
