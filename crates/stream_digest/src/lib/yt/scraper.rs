use std::ops::Deref;

use reqwest::StatusCode;

use crate::{
    error::FetchError,
    parser::{parse_timed_text, select_caption_track, YtHtmlDocument},
    types::TranscriptSegment,
    yt::{
        types::{OEmbedResponse, PlayerResponse, TimedText},
        MetadataProvider, TranscriptProvider,
    },
};

/// Transcript and metadata collaborator backed by public YouTube endpoints
#[derive(Debug, Clone)]
pub struct YtClient {
    client: reqwest::Client,
    language: String,
}

impl Default for YtClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl Deref for YtClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl YtClient {
    const WATCH_URL: &str = "https://www.youtube.com/watch";
    const OEMBED_URL: &str = "https://www.youtube.com/oembed";

    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            language: "en".into(),
        }
    }

    /// Preferred caption language (e.g. `en`, `sw`)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_player_response(&self, video_id: &str) -> Result<PlayerResponse, FetchError> {
        let html = self
            .get(Self::WATCH_URL)
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let doc = YtHtmlDocument::from(html);
        Ok(doc.to_json::<PlayerResponse>()?)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_oembed_title(&self, video_id: &str) -> Result<String, FetchError> {
        let video_url = format!("{}?v={}", Self::WATCH_URL, video_id);

        let resp = self
            .get(Self::OEMBED_URL)
            .query(&[("url", video_url.as_str()), ("format", "json")])
            .send()
            .await?;

        // oEmbed answers 401 for private videos and 404 for missing ones
        if matches!(resp.status(), StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED) {
            return Err(FetchError::NotFound(video_id.to_string()));
        }

        let oembed = resp.error_for_status()?.json::<OEmbedResponse>().await?;
        tracing::debug!(author = ?oembed.author_name, "Fetched video metadata");

        Ok(oembed.title)
    }
}

impl TranscriptProvider for YtClient {
    type Error = FetchError;

    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, FetchError> {
        let player = self.fetch_player_response(video_id).await?;

        if let Some(status) = &player.playability_status {
            if status.status != "OK" {
                tracing::warn!(
                    status = %status.status,
                    reason = ?status.reason,
                    "Video is not playable"
                );
                return Err(FetchError::NotFound(video_id.to_string()));
            }
        }

        let tracks = player
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|r| r.caption_tracks)
            .unwrap_or_default();

        let track = select_caption_track(&tracks, &self.language)
            .ok_or_else(|| FetchError::Disabled(video_id.to_string()))?;
        tracing::debug!(language = %track.language_code, auto = track.is_auto_generated(), "Selected caption track");

        let timed_text = self
            .get(&track.base_url)
            .query(&[("fmt", "json3")])
            .send()
            .await?
            .error_for_status()?
            .json::<TimedText>()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to download caption track"))?;

        Ok(parse_timed_text(&timed_text))
    }
}

impl MetadataProvider for YtClient {
    type Error = FetchError;

    /// Reads the title from oEmbed, falling back to the watch page when the
    /// oEmbed endpoint is unavailable
    #[tracing::instrument(skip(self))]
    async fn fetch_title(&self, video_id: &str) -> Result<String, FetchError> {
        match self.fetch_oembed_title(video_id).await {
            Ok(title) => Ok(title),
            Err(FetchError::NotFound(id)) => Err(FetchError::NotFound(id)),
            Err(e) => {
                tracing::warn!(error = %e, "oEmbed lookup failed, reading title from watch page");
                let player = self.fetch_player_response(video_id).await?;
                player.title().map(str::to_string).ok_or(e)
            }
        }
    }
}
