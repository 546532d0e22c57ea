use serde::{Deserialize, Serialize};

/// A single caption line as returned by the transcript provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub offset_ms: u64,
    pub duration_ms: u64,
}

/// A bounded, word-count-limited slice of the source transcript.
///
/// `index` defines both processing and reassembly order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    Ok,
    Failed,
}

/// Outcome of summarizing one chunk. Created once the generation call
/// resolves (or fails) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub index: usize,
    pub status: ChunkStatus,
    pub summary_text: String,
    pub error_detail: Option<String>,
}

impl ChunkResult {
    pub fn ok(index: usize, summary_text: impl Into<String>) -> Self {
        Self {
            index,
            status: ChunkStatus::Ok,
            summary_text: summary_text.into(),
            error_detail: None,
        }
    }

    pub fn failed(index: usize, error_detail: impl Into<String>) -> Self {
        Self {
            index,
            status: ChunkStatus::Failed,
            summary_text: String::new(),
            error_detail: Some(error_detail.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ChunkStatus::Ok
    }
}

/// A chunk summary that made it through the gate, still tagged with the
/// index of the chunk it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub index: usize,
    pub text: String,
}

impl ChunkSummary {
    /// One-based part number used when labeling summaries in prompts
    pub fn part_number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSection {
    pub title: String,
    pub content: String,
}

/// The terminal artifact of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub introduction: String,
    pub sections: Vec<ArticleSection>,
    pub conclusion: String,
}

impl Article {
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# {}\n\n{}\n", self.title.trim(), self.introduction.trim());

        for section in &self.sections {
            md.push_str(&format!(
                "\n## {}\n\n{}\n",
                section.title.trim(),
                section.content.trim()
            ));
        }

        md.push_str(&format!("\n## Conclusion\n\n{}\n", self.conclusion.trim()));
        md
    }
}

/// Where the returned [`Article`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSource {
    Synthesized,
    Fallback,
}

/// Successful pipeline result: the article plus how it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleOutcome {
    pub article: Article,
    pub source: ArticleSource,
    /// Set when transcript content past `max_units` chunks was dropped
    pub truncated: bool,
    pub chunks_total: usize,
    pub chunks_failed: usize,
}
