mod error;
mod llm;
pub mod parser;
mod pipeline;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::{ErrorKind, FetchError, ParseError, PipelineError};
pub use llm::generator::{GenerationRequest, Generator, ResponseFormat};
pub use llm::openai;
pub use pipeline::{
    builder::{ArticlePipelineBuilder, PipelineConfig},
    chunker::{chunk, ChunkPlan, EmptyInputError},
    fallback::{assemble_fallback, FALLBACK_SECTION_TITLE},
    gate::gate,
    summarize::summarize_all,
    synthesis::{synthesis_prompt, synthesize},
    validate::{validate, ValidationError},
    ArticlePipeline, Stage,
};
