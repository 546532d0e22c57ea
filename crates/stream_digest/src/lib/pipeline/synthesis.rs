use crate::{
    error::PipelineError,
    llm::generator::{GenerationRequest, Generator, ResponseFormat},
    pipeline::builder::PipelineConfig,
    types::ChunkSummary,
};

const SYNTHESIS_SYSTEM_PROMPT: &str = include_str!("./prompts/synthesis_system.txt");

/// Builds the user prompt for the synthesis call. Each summary is labeled
/// with the part number of the chunk it came from, so gaps left by failed
/// chunks stay visible.
pub fn synthesis_prompt(title_hint: &str, summaries: &[ChunkSummary]) -> String {
    let mut prompt = format!("Video title: {title_hint}\n\nNotes from the transcript:\n");

    for summary in summaries {
        prompt.push_str(&format!(
            "\n### Part {}\n{}\n",
            summary.part_number(),
            summary.text.trim()
        ));
    }

    prompt.push_str("\nWrite the article as a JSON object with 3 to 5 sections.");
    prompt
}

/// Issues the single synthesis call and returns the raw response text.
/// Transport failures and timeouts are fatal.
#[tracing::instrument(skip_all, fields(summaries = summaries.len()))]
pub async fn synthesize<G>(
    title_hint: &str,
    summaries: &[ChunkSummary],
    generator: &G,
    config: &PipelineConfig,
) -> Result<String, PipelineError>
where
    G: Generator + Sync,
{
    let request = GenerationRequest {
        model: config.model.clone(),
        system_prompt: SYNTHESIS_SYSTEM_PROMPT.into(),
        user_prompt: synthesis_prompt(title_hint, summaries),
        temperature: config.synthesis_temperature,
        response_format: ResponseFormat::JsonObject,
    };

    match tokio::time::timeout(config.request_timeout, generator.generate(request)).await {
        Ok(Ok(raw)) => Ok(raw),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Article synthesis call failed");
            Err(PipelineError::SynthesisFailed(e.to_string()))
        }
        Err(_) => {
            tracing::error!(timeout = ?config.request_timeout, "Article synthesis call timed out");
            Err(PipelineError::SynthesisFailed(format!(
                "timed out after {:?}",
                config.request_timeout
            )))
        }
    }
}
