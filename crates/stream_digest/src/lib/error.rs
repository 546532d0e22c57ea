use std::fmt;

use crate::pipeline::Stage;

/// Errors raised while scraping youtube pages and caption payloads
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Structure(&'static str),
    #[error("Failed to deserialize: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a transcript or metadata collaborator
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Video {0} was not found or is unavailable")]
    NotFound(String),
    #[error("Transcripts are disabled for video {0}")]
    Disabled(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of a [`PipelineError`], suitable for mapping onto
/// status codes or exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingSource,
    UpstreamFailure,
    GenerationUnavailable,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::MissingSource => "missing_source",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::GenerationUnavailable => "generation_unavailable",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Fatal pipeline errors. Anything recoverable (single chunk failures,
/// malformed synthesis output) never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Transcript for video {video_id} is empty")]
    EmptyTranscript { video_id: String },
    #[error("Failed to fetch transcript: {0}")]
    UpstreamFetch(#[from] FetchError),
    #[error("All {total} chunk summarization calls failed")]
    AllChunksFailed { total: usize },
    #[error("Article synthesis call failed: {0}")]
    SynthesisFailed(String),
    #[error("Pipeline cancelled during {stage}")]
    Cancelled { stage: Stage },
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::EmptyTranscript { .. } => ErrorKind::MissingSource,
            PipelineError::UpstreamFetch(FetchError::NotFound(_) | FetchError::Disabled(_)) => {
                ErrorKind::MissingSource
            }
            PipelineError::UpstreamFetch(_) => ErrorKind::UpstreamFailure,
            PipelineError::AllChunksFailed { .. } | PipelineError::SynthesisFailed(_) => {
                ErrorKind::GenerationUnavailable
            }
            PipelineError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}
