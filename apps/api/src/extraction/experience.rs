//! Experience: one LLM call returning a numbered list of role titles.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::prompts::{EXPERIENCE_MAX_TOKENS, EXPERIENCE_PROMPT, EXPERIENCE_TEXT_LIMIT};
use crate::extraction::truncate_chars;
use crate::llm_client::prompts::{EXTRACTION_TEMPERATURE, RESUME_PARSER_SYSTEM};
use crate::llm_client::{ApiKey, ChatCompleter, CompletionRequest, LlmError};

static LIST_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\-\d\.]+\s*").expect("list marker pattern is valid"));

pub async fn extract_experience(
    text: &str,
    llm: &dyn ChatCompleter,
    api_key: &ApiKey,
) -> Result<Vec<String>, LlmError> {
    let prompt = EXPERIENCE_PROMPT.replace(
        "{resume_text}",
        truncate_chars(text, EXPERIENCE_TEXT_LIMIT),
    );
    let raw = llm
        .complete(
            api_key,
            CompletionRequest {
                system: RESUME_PARSER_SYSTEM,
                prompt: &prompt,
                temperature: EXTRACTION_TEMPERATURE,
                max_tokens: EXPERIENCE_MAX_TOKENS,
            },
        )
        .await?;
    Ok(parse_experience(&raw))
}

/// One entry per non-empty line.
///
/// Lines starting with a digit or `-` lose their leading run of digits, dots
/// and dashes (plus following whitespace) and are dropped if nothing remains.
/// Any other line is kept verbatim after trimming.
pub fn parse_experience(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let marked = line.starts_with('-') || line.chars().next().is_some_and(|c| c.is_numeric());
            if marked {
                let stripped = LIST_MARKER_RE.replace(line, "");
                (!stripped.is_empty()).then(|| stripped.into_owned())
            } else {
                Some(line.to_string())
            }
        })
        .collect()
}
