//! Skills: one LLM call returning a comma-separated list.

use crate::extraction::prompts::{SKILLS_MAX_TOKENS, SKILLS_PROMPT, SKILLS_TEXT_LIMIT};
use crate::extraction::truncate_chars;
use crate::llm_client::prompts::{EXTRACTION_TEMPERATURE, RESUME_PARSER_SYSTEM};
use crate::llm_client::{ApiKey, ChatCompleter, CompletionRequest, LlmError};

pub async fn extract_skills(
    text: &str,
    llm: &dyn ChatCompleter,
    api_key: &ApiKey,
) -> Result<Vec<String>, LlmError> {
    let prompt = SKILLS_PROMPT.replace("{resume_text}", truncate_chars(text, SKILLS_TEXT_LIMIT));
    let raw = llm
        .complete(
            api_key,
            CompletionRequest {
                system: RESUME_PARSER_SYSTEM,
                prompt: &prompt,
                temperature: EXTRACTION_TEMPERATURE,
                max_tokens: SKILLS_MAX_TOKENS,
            },
        )
        .await?;
    Ok(parse_skills(&raw))
}

/// Splits on commas, trims each fragment and drops empty ones. Order and
/// duplicates are preserved.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skills_trims_and_drops_trailing_fragment() {
        assert_eq!(
            parse_skills("Python, Java ,  SQL,"),
            vec!["Python", "Java", "SQL"]
        );
    }

    #[test]
    fn test_parse_skills_keeps_duplicates_in_order() {
        assert_eq!(
            parse_skills("SQL, Rust, SQL"),
            vec!["SQL", "Rust", "SQL"]
        );
    }

    #[test]
    fn test_parse_skills_empty_response() {
        assert!(parse_skills("").is_empty());
        assert!(parse_skills(" , ,").is_empty());
    }

    #[test]
    fn test_parse_skills_keeps_newlines_inside_fragment_trimmed() {
        assert_eq!(
            parse_skills("Leadership,\nCommunication"),
            vec!["Leadership", "Communication"]
        );
    }
}
