use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};
use stream_digest::{GenerationRequest, Generator, ResponseFormat};

#[derive(Clone)]
pub struct MockGenerator {
    /// Raw synthesis response; `None` makes the synthesis call fail
    pub synthesis_response: Option<String>,
    /// One-based part numbers whose chunk call fails
    pub failing_parts: HashSet<usize>,
    pub fail_all_chunks: bool,
    pub chunk_delay: Duration,
    pub synthesis_delay: Duration,
    pub calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerator {
    pub fn new(synthesis_response: &str) -> Self {
        Self {
            synthesis_response: Some(synthesis_response.to_string()),
            failing_parts: HashSet::new(),
            fail_all_chunks: false,
            chunk_delay: Duration::ZERO,
            synthesis_delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_synthesis() -> Self {
        Self {
            synthesis_response: None,
            ..Self::new("")
        }
    }

    pub fn failing_parts(mut self, parts: &[usize]) -> Self {
        self.failing_parts = parts.iter().copied().collect();
        self
    }

    pub fn failing_all_chunks(mut self) -> Self {
        self.fail_all_chunks = true;
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_synthesis_delay(mut self, delay: Duration) -> Self {
        self.synthesis_delay = delay;
        self
    }

    pub fn chunk_calls(&self) -> Vec<GenerationRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.response_format == ResponseFormat::Text)
            .cloned()
            .collect()
    }

    pub fn synthesis_calls(&self) -> Vec<GenerationRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.response_format == ResponseFormat::JsonObject)
            .cloned()
            .collect()
    }
}

/// Reads the part number out of "Transcript part N of M: ..."
fn part_number(prompt: &str) -> usize {
    prompt
        .split_whitespace()
        .nth(2)
        .and_then(|p| p.parse().ok())
        .unwrap_or(0)
}

impl Generator for MockGenerator {
    type Error = anyhow::Error;

    async fn generate(&self, request: GenerationRequest) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(request.clone());

        if request.response_format == ResponseFormat::JsonObject {
            if !self.synthesis_delay.is_zero() {
                tokio::time::sleep(self.synthesis_delay).await;
            }
            return self
                .synthesis_response
                .clone()
                .ok_or_else(|| anyhow::anyhow!("API error: 503 - model overloaded"));
        }

        if !self.chunk_delay.is_zero() {
            tokio::time::sleep(self.chunk_delay).await;
        }

        let part = part_number(&request.user_prompt);
        if self.fail_all_chunks || self.failing_parts.contains(&part) {
            return Err(anyhow::anyhow!("API error: 429 - rate limited"));
        }

        let first_word = request
            .user_prompt
            .lines()
            .nth(2)
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or_default();

        Ok(format!("Facts from part {part}, starting at {first_word}."))
    }
}
