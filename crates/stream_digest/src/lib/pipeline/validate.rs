use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::Article;

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Response is not a valid article object: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Expected a JSON object for the {0}")]
    NotAnObject(&'static str),
    #[error("Article {0} is empty")]
    EmptyField(&'static str),
    #[error("Article has no sections")]
    NoSections,
    #[error("Section {index} has an empty {field}")]
    EmptySectionField { index: usize, field: &'static str },
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Parses raw synthesis output into an [`Article`], rejecting anything that
/// breaks its invariants. Never returns a partially filled article.
pub fn validate(raw: &str) -> Result<Article, ValidationError> {
    let trimmed = raw.trim();
    // models occasionally wrap the object in a markdown fence
    let body = CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|cap| cap.get(1))
        .map_or(trimmed, |m| m.as_str());

    // serde would otherwise map a JSON array onto the fields by position
    let value = serde_json::from_str::<Value>(body)?;
    let Value::Object(fields) = &value else {
        return Err(ValidationError::NotAnObject("article"));
    };
    if let Some(Value::Array(sections)) = fields.get("sections") {
        if sections.iter().any(|section| !section.is_object()) {
            return Err(ValidationError::NotAnObject("section"));
        }
    }

    let article = serde_json::from_value::<Article>(value)?;

    require(&article.title, "title")?;
    require(&article.introduction, "introduction")?;
    require(&article.conclusion, "conclusion")?;

    if article.sections.is_empty() {
        return Err(ValidationError::NoSections);
    }

    for (index, section) in article.sections.iter().enumerate() {
        if section.title.trim().is_empty() {
            return Err(ValidationError::EmptySectionField {
                index,
                field: "title",
            });
        }
        if section.content.trim().is_empty() {
            return Err(ValidationError::EmptySectionField {
                index,
                field: "content",
            });
        }
    }

    Ok(article)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::ArticleSection;

    fn well_formed() -> serde_json::Value {
        json!({
            "title": "Budget Day",
            "introduction": "Parliament sat to hear the budget.",
            "sections": [
                {"title": "Revenue", "content": "Taxes rise."},
                {"title": "Spending", "content": "Roads and schools."},
                {"title": "Reaction", "content": "Mixed."}
            ],
            "conclusion": "The budget passed its first reading."
        })
    }

    #[test]
    fn test_accepts_well_formed_article_unchanged() {
        let article = validate(&well_formed().to_string()).unwrap();

        assert_eq!(
            article,
            Article {
                title: "Budget Day".into(),
                introduction: "Parliament sat to hear the budget.".into(),
                sections: vec![
                    ArticleSection {
                        title: "Revenue".into(),
                        content: "Taxes rise.".into()
                    },
                    ArticleSection {
                        title: "Spending".into(),
                        content: "Roads and schools.".into()
                    },
                    ArticleSection {
                        title: "Reaction".into(),
                        content: "Mixed.".into()
                    },
                ],
                conclusion: "The budget passed its first reading.".into(),
            }
        );
    }

    #[test]
    fn test_accepts_surrounding_whitespace_and_code_fence() {
        let raw = format!("\n  ```json\n{}\n```  \n", well_formed());
        assert!(validate(&raw).is_ok());

        let raw = format!("\n\n{}\n\n", well_formed());
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(validate("not json"), Err(ValidationError::Parse(_))));
        assert!(matches!(validate(""), Err(ValidationError::Parse(_))));
        assert!(matches!(
            validate("[1, 2]"),
            Err(ValidationError::NotAnObject("article"))
        ));
        assert!(matches!(
            validate(r#""an article""#),
            Err(ValidationError::NotAnObject("article"))
        ));
    }

    #[test]
    fn test_rejects_positional_array_article() {
        let raw = r#"["T","Intro",[{"title":"S","content":"C"}],"End"]"#;
        assert!(matches!(
            validate(raw),
            Err(ValidationError::NotAnObject("article"))
        ));

        let fenced = format!("```json\n{raw}\n```");
        assert!(matches!(
            validate(&fenced),
            Err(ValidationError::NotAnObject("article"))
        ));

        let mut value = well_formed();
        value["sections"][0] = json!(["Revenue", "Taxes rise."]);
        assert!(matches!(
            validate(&value.to_string()),
            Err(ValidationError::NotAnObject("section"))
        ));
    }

    #[test]
    fn test_rejects_missing_fields() {
        for field in ["title", "introduction", "sections", "conclusion"] {
            let mut value = well_formed();
            value.as_object_mut().unwrap().remove(field);

            assert!(
                matches!(validate(&value.to_string()), Err(ValidationError::Parse(_))),
                "missing {field} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_empty_or_blank_fields() {
        let mut value = well_formed();
        value["introduction"] = json!("   ");
        assert!(matches!(
            validate(&value.to_string()),
            Err(ValidationError::EmptyField("introduction"))
        ));

        let mut value = well_formed();
        value["title"] = json!("");
        assert!(matches!(
            validate(&value.to_string()),
            Err(ValidationError::EmptyField("title"))
        ));
    }

    #[test]
    fn test_rejects_empty_section_list() {
        let mut value = well_formed();
        value["sections"] = json!([]);
        assert!(matches!(
            validate(&value.to_string()),
            Err(ValidationError::NoSections)
        ));
    }

    #[test]
    fn test_rejects_incomplete_sections() {
        let mut value = well_formed();
        value["sections"][1]["content"] = json!("");
        assert!(matches!(
            validate(&value.to_string()),
            Err(ValidationError::EmptySectionField {
                index: 1,
                field: "content"
            })
        ));

        let mut value = well_formed();
        value["sections"][0] = json!({"content": "no title"});
        assert!(matches!(
            validate(&value.to_string()),
            Err(ValidationError::Parse(_))
        ));
    }
}
