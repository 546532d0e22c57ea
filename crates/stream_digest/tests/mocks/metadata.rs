use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use stream_digest::{yt::MetadataProvider, FetchError};

#[derive(Clone)]
pub struct MockMetadataProvider {
    pub title: Option<String>,
    pub delay: Duration,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockMetadataProvider {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            title: None,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl MetadataProvider for MockMetadataProvider {
    type Error = FetchError;

    async fn fetch_title(&self, video_id: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.title
            .clone()
            .ok_or_else(|| FetchError::Other("oEmbed returned 500".into()))
    }
}
