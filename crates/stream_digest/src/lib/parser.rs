//! # Yt Parser
//!
//! Extracts the player response embedded in a YouTube watch page and turns
//! caption payloads into ordered transcript segments.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{
    error::ParseError,
    types::TranscriptSegment,
    yt::types::{CaptionTrack, TimedText},
};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)(?:var\s+)?ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

/// Picks the caption track to download.
///
/// Preference order: manual track in `lang`, auto-generated track in `lang`,
/// any manual track, then whatever comes first.
pub fn select_caption_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    let matches_lang = |t: &&CaptionTrack| {
        t.language_code == lang || t.language_code.split('-').next() == Some(lang)
    };

    tracks
        .iter()
        .filter(matches_lang)
        .find(|t| !t.is_auto_generated())
        .or_else(|| tracks.iter().find(matches_lang))
        .or_else(|| tracks.iter().find(|t| !t.is_auto_generated()))
        .or_else(|| tracks.first())
}

/// Converts a `json3` timed-text payload into transcript segments ordered by
/// offset. Events without text (window/style events, bare newlines) are
/// skipped.
#[tracing::instrument(skip_all)]
pub fn parse_timed_text(timed_text: &TimedText) -> Vec<TranscriptSegment> {
    let mut segments = timed_text
        .events
        .iter()
        .filter_map(|event| {
            let text = event
                .segs
                .as_ref()?
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();

            (!text.is_empty()).then(|| TranscriptSegment {
                text: text.to_string(),
                offset_ms: event.t_start_ms,
                duration_ms: event.d_duration_ms,
            })
        })
        .collect::<Vec<_>>();

    segments.sort_by_key(|s| s.offset_ms);
    segments
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn to_json<T>(&self) -> Result<T, ParseError>
    where
        T: DeserializeOwned,
    {
        let raw = YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .ok_or(ParseError::Structure(
                "Failed to extract ytInitialPlayerResponse from the page's script tag",
            ))?;

        Ok(serde_json::from_str(raw.as_str())?)
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
