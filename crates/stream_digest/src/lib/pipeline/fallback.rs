use itertools::Itertools;

use crate::types::{Article, ArticleSection, ChunkSummary};

pub const FALLBACK_SECTION_TITLE: &str = "Key Points";

const EMPTY_NOTES: &str = "No detailed notes could be recovered from this video.";

/// Builds a minimal article straight from the chunk summaries.
///
/// Used when the synthesized article does not validate. Blank summaries are
/// skipped, and the result always satisfies the article invariants.
pub fn assemble_fallback(title_hint: &str, summaries: &[ChunkSummary]) -> Article {
    let title_hint = title_hint.trim();

    let content = summaries
        .iter()
        .map(|s| s.text.trim())
        .filter(|text| !text.is_empty())
        .join("\n\n");

    Article {
        title: format!("{title_hint} - Summary"),
        introduction: format!(
            "This article summarizes the key points discussed in \"{title_hint}\"."
        ),
        sections: vec![ArticleSection {
            title: FALLBACK_SECTION_TITLE.into(),
            content: if content.is_empty() {
                EMPTY_NOTES.into()
            } else {
                content
            },
        }],
        conclusion: "These notes capture the main points of the video; watch the full recording for complete context.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::validate::validate;

    fn summaries(texts: &[&str]) -> Vec<ChunkSummary> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| ChunkSummary {
                index,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_fallback_shape() {
        let article = assemble_fallback("Question Time", &summaries(&["First.", " Second. "]));

        assert_eq!(article.title, "Question Time - Summary");
        assert!(article.introduction.contains("Question Time"));
        assert_eq!(article.sections.len(), 1);
        assert_eq!(article.sections[0].title, "Key Points");
        assert_eq!(article.sections[0].content, "First.\n\nSecond.");
        assert!(!article.conclusion.is_empty());
    }

    #[test]
    fn test_fallback_always_validates() {
        for texts in [vec!["one"], vec!["a", "b", "c"], vec!["multi\nline", "x"]] {
            let article = assemble_fallback("Video abc", &summaries(&texts));
            let raw = serde_json::to_string(&article).unwrap();

            assert_eq!(validate(&raw).unwrap(), article);
        }
    }

    #[test]
    fn test_blank_summaries_are_skipped() {
        let article = assemble_fallback("Sitting", &summaries(&["   ", "Quorum called.", "\n"]));
        assert_eq!(article.sections[0].content, "Quorum called.");

        let article = assemble_fallback("Sitting", &summaries(&["   "]));
        let raw = serde_json::to_string(&article).unwrap();
        assert_eq!(validate(&raw).unwrap(), article);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let input = summaries(&["alpha", "beta"]);
        assert_eq!(
            assemble_fallback("Sitting", &input),
            assemble_fallback("Sitting", &input)
        );
    }
}
