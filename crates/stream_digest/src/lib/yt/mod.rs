pub mod scraper;
pub mod types;

use std::{fmt::Debug, future::Future, sync::LazyLock};

use regex::Regex;

use crate::{error::FetchError, types::TranscriptSegment};

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:.*&)?v=|shorts/|embed/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

static BARE_VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// Resolves a video id from either a bare id or any of the common YouTube
/// URL shapes
pub fn parse_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if BARE_VIDEO_ID_RE.is_match(input) {
        return Some(input.to_string());
    }

    VIDEO_ID_RE
        .captures(input)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

pub trait TranscriptProvider {
    type Error: Debug + Into<FetchError>;

    /// Returns the transcript of `video_id` as segments ordered by offset
    fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<Vec<TranscriptSegment>, Self::Error>> + Send;
}

pub trait MetadataProvider {
    type Error: Debug + Into<FetchError>;

    fn fetch_title(&self, video_id: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
