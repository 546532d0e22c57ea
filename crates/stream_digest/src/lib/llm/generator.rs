use std::{fmt::Display, future::Future};

/// Output shape requested from the generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

/// A text-generation backend. Implementations are injected into the
/// pipeline, which keeps the prompts and turns any error into a typed result.
pub trait Generator {
    type Error: Display + Send;

    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
