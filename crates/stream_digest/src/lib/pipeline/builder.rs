use std::{num::NonZeroUsize, time::Duration};

use crate::{
    llm::generator::Generator,
    yt::{MetadataProvider, TranscriptProvider},
    ArticlePipeline,
};

/// Tunables for one pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub model: String,
    /// Words per chunk
    pub unit_size: NonZeroUsize,
    /// Upper bound on the number of chunks; further words are dropped
    pub max_units: NonZeroUsize,
    /// Chunk summarization calls allowed in flight at once
    pub concurrency_limit: NonZeroUsize,
    pub chunk_temperature: f32,
    pub synthesis_temperature: f32,
    /// Applied to every external call individually
    pub request_timeout: Duration,
}

impl PipelineConfig {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_UNIT_SIZE: NonZeroUsize = NonZeroUsize::new(4000).unwrap();
    pub const DEFAULT_MAX_UNITS: NonZeroUsize = NonZeroUsize::new(5).unwrap();
    pub const DEFAULT_CONCURRENCY_LIMIT: NonZeroUsize = NonZeroUsize::new(3).unwrap();
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.into(),
            unit_size: Self::DEFAULT_UNIT_SIZE,
            max_units: Self::DEFAULT_MAX_UNITS,
            concurrency_limit: Self::DEFAULT_CONCURRENCY_LIMIT,
            chunk_temperature: 0.3,
            synthesis_temperature: 0.7,
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub struct ArticlePipelineBuilder<T = (), M = (), G = ()> {
    transcripts: T,
    metadata: M,
    generator: G,
    config: PipelineConfig,
}

impl ArticlePipelineBuilder {
    pub fn new() -> Self {
        Self {
            transcripts: (),
            metadata: (),
            generator: (),
            config: PipelineConfig::default(),
        }
    }
}

impl Default for ArticlePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, M, G> ArticlePipelineBuilder<T, M, G> {
    pub fn transcripts<T2: TranscriptProvider + Send + Sync + 'static>(
        self,
        transcripts: T2,
    ) -> ArticlePipelineBuilder<T2, M, G> {
        ArticlePipelineBuilder {
            transcripts,
            metadata: self.metadata,
            generator: self.generator,
            config: self.config,
        }
    }

    pub fn metadata<M2: MetadataProvider + Send + Sync + 'static>(
        self,
        metadata: M2,
    ) -> ArticlePipelineBuilder<T, M2, G> {
        ArticlePipelineBuilder {
            transcripts: self.transcripts,
            metadata,
            generator: self.generator,
            config: self.config,
        }
    }

    pub fn generator<G2: Generator + Send + Sync + 'static>(
        self,
        generator: G2,
    ) -> ArticlePipelineBuilder<T, M, G2> {
        ArticlePipelineBuilder {
            transcripts: self.transcripts,
            metadata: self.metadata,
            generator,
            config: self.config,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn with_chunking(mut self, unit_size: NonZeroUsize, max_units: NonZeroUsize) -> Self {
        self.config.unit_size = unit_size;
        self.config.max_units = max_units;
        self
    }

    pub fn concurrency_limit(mut self, concurrency_limit: NonZeroUsize) -> Self {
        self.config.concurrency_limit = concurrency_limit;
        self
    }

    pub fn temperatures(mut self, chunk: f32, synthesis: f32) -> Self {
        self.config.chunk_temperature = chunk;
        self.config.synthesis_temperature = synthesis;
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.config.request_timeout = request_timeout;
        self
    }
}

impl<T, M, G> ArticlePipelineBuilder<T, M, G>
where
    T: TranscriptProvider + Send + Sync + 'static,
    M: MetadataProvider + Send + Sync + 'static,
    G: Generator + Send + Sync + 'static,
{
    pub fn build(self) -> ArticlePipeline<T, M, G> {
        ArticlePipeline {
            transcripts: self.transcripts,
            metadata: self.metadata,
            generator: self.generator,
            config: self.config,
        }
    }
}
