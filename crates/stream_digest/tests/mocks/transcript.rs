use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use stream_digest::{types::TranscriptSegment, yt::TranscriptProvider, FetchError};

#[derive(Clone)]
pub enum MockFailure {
    NotFound,
    Disabled,
    Other(String),
}

#[derive(Clone)]
pub struct MockTranscriptProvider {
    pub segments: Vec<TranscriptSegment>,
    pub fail_with: Option<MockFailure>,
    pub delay: Duration,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockTranscriptProvider {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            fail_with: None,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A transcript of `n` words `w0 .. w{n-1}`, ten words per segment
    pub fn with_words(n: usize) -> Self {
        let words = (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>();
        let segments = words
            .chunks(10)
            .enumerate()
            .map(|(i, window)| TranscriptSegment {
                text: window.join(" "),
                offset_ms: i as u64 * 4_000,
                duration_ms: 4_000,
            })
            .collect();
        Self::new(segments)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            fail_with: Some(failure),
            ..Self::new(Vec::new())
        }
    }
}

impl TranscriptProvider for MockTranscriptProvider {
    type Error = FetchError;

    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, FetchError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(MockFailure::NotFound) => Err(FetchError::NotFound(video_id.to_string())),
            Some(MockFailure::Disabled) => Err(FetchError::Disabled(video_id.to_string())),
            Some(MockFailure::Other(msg)) => Err(FetchError::Other(msg.clone())),
            None => Ok(self.segments.clone()),
        }
    }
}
