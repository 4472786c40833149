// Field extraction pipeline.
// Local heuristics (regex, capitalisation, NER) for name/email/phone and two
// independent LLM calls for skills and experience.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod contact;
pub mod experience;
pub mod handlers;
pub mod name;
pub mod pdf_loader;
pub mod prompts;
pub mod skills;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::llm_client::{resolve_api_key, ApiKey, ChatCompleter, LlmError};
use crate::models::ResumeRecord;

pub use contact::{extract_email, extract_phone};
pub use experience::extract_experience;
pub use name::{extract_name, CapitalizedNameRecognizer, NameRecognizer};
pub use pdf_loader::{extract_text_from_pdf, PdfError};
pub use skills::extract_skills;

/// Which remote-extracted field a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmField {
    Skills,
    Experience,
}

impl std::fmt::Display for LlmField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmField::Skills => f.write_str("skills"),
            LlmField::Experience => f.write_str("experience"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("OpenAI API key not set")]
    MissingCredential,

    #[error("{field} extraction failed: {source}")]
    Llm {
        field: LlmField,
        #[source]
        source: LlmError,
    },

    #[error("{field} extraction timed out after {}s", .after.as_secs())]
    Timeout { field: LlmField, after: Duration },
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Runs the full pipeline over one document's text.
///
/// The credential is checked before any network call. Skills and experience
/// are requested concurrently, each under its own timeout; either failure
/// aborts the extraction with no fallback value.
pub async fn extract_fields(
    text: &str,
    recognizer: &dyn NameRecognizer,
    llm: &dyn ChatCompleter,
    api_key: Option<&ApiKey>,
    timeout: Duration,
) -> Result<ResumeRecord, ExtractError> {
    let api_key = api_key.ok_or(ExtractError::MissingCredential)?;

    let name = extract_name(text, recognizer);
    let email = extract_email(text);
    let phone = extract_phone(text);
    debug!(
        has_name = !name.is_empty(),
        has_email = !email.is_empty(),
        has_phone = !phone.is_empty(),
        "Local field extraction complete"
    );

    let (skills, experience) = tokio::try_join!(
        with_timeout(LlmField::Skills, timeout, extract_skills(text, llm, api_key)),
        with_timeout(
            LlmField::Experience,
            timeout,
            extract_experience(text, llm, api_key)
        ),
    )?;

    info!(
        skills = skills.len(),
        experience = experience.len(),
        "Field extraction complete"
    );

    Ok(ResumeRecord {
        name,
        email,
        phone,
        skills,
        experience,
    })
}

async fn with_timeout<T>(
    field: LlmField,
    after: Duration,
    call: impl Future<Output = Result<T, LlmError>>,
) -> Result<T, ExtractError> {
    match tokio::time::timeout(after, call).await {
        Ok(result) => result.map_err(|source| ExtractError::Llm { field, source }),
        Err(_) => Err(ExtractError::Timeout { field, after }),
    }
}

/// Owns the extraction collaborators for the lifetime of the process.
///
/// The configured key is resolved once at startup; callers may still supply
/// an explicit key per extraction, which takes precedence.
#[derive(Clone)]
pub struct FieldExtractor {
    recognizer: Arc<dyn NameRecognizer>,
    llm: Arc<dyn ChatCompleter>,
    configured_key: Option<ApiKey>,
    timeout: Duration,
}

impl FieldExtractor {
    pub fn new(
        recognizer: Arc<dyn NameRecognizer>,
        llm: Arc<dyn ChatCompleter>,
        configured_key: Option<ApiKey>,
        timeout: Duration,
    ) -> Self {
        Self {
            recognizer,
            llm,
            configured_key,
            timeout,
        }
    }

    pub fn has_configured_key(&self) -> bool {
        self.configured_key.is_some()
    }

    pub async fn extract(
        &self,
        text: &str,
        explicit_key: Option<&str>,
    ) -> Result<ResumeRecord, ExtractError> {
        let api_key = resolve_api_key(explicit_key, self.configured_key.as_ref());
        extract_fields(
            text,
            self.recognizer.as_ref(),
            self.llm.as_ref(),
            api_key.as_ref(),
            self.timeout,
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::extraction::prompts::{SKILLS_MAX_TOKENS, EXPERIENCE_MAX_TOKENS};
    use crate::llm_client::{ApiKey, ChatCompleter, CompletionRequest, LlmError};

    /// Answers skills and experience prompts with canned text and records every call.
    #[derive(Default)]
    pub struct ScriptedCompleter {
        pub skills_reply: String,
        pub experience_reply: String,
        pub fail_experience: bool,
        pub delay: Option<Duration>,
        pub calls: AtomicUsize,
        pub seen: Mutex<Vec<(String, u32, f32, String)>>,
    }

    impl ScriptedCompleter {
        pub fn new(skills_reply: &str, experience_reply: &str) -> Self {
            Self {
                skills_reply: skills_reply.to_string(),
                experience_reply: experience_reply.to_string(),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatCompleter for ScriptedCompleter {
        async fn complete(
            &self,
            api_key: &ApiKey,
            request: CompletionRequest<'_>,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((
                request.prompt.to_string(),
                request.max_tokens,
                request.temperature,
                api_key.expose().to_string(),
            ));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match request.max_tokens {
                SKILLS_MAX_TOKENS => Ok(self.skills_reply.clone()),
                EXPERIENCE_MAX_TOKENS if self.fail_experience => Err(LlmError::Api {
                    status: 429,
                    message: "quota exceeded".to_string(),
                }),
                EXPERIENCE_MAX_TOKENS => Ok(self.experience_reply.clone()),
                _ => Err(LlmError::EmptyContent),
            }
        }
    }

    /// Builds a minimal PDF with one Helvetica text line per entry of `pages`.
    pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
        // 1: catalog, 2: page tree, 3: font, then a page and its content per entry.
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (text, page_id) in pages.iter().zip(&page_ids) {
            let escaped = text
                .replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)");
            let content = format!("BT /F1 12 Tf 72 720 Td ({escaped}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedCompleter;
    use super::*;

    const RESUME: &str = "JANE DOE\njane.doe@example.com | +1 555 010 2030\n\
        Experience\n1. Backend Engineer at Acme\nSkills: Rust, SQL";

    fn extractor(llm: Arc<ScriptedCompleter>, key: Option<&str>) -> FieldExtractor {
        FieldExtractor::new(
            Arc::new(CapitalizedNameRecognizer),
            llm,
            key.and_then(ApiKey::new),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[tokio::test]
    async fn test_extract_builds_full_record() {
        let llm = Arc::new(ScriptedCompleter::new(
            "Rust, SQL ,",
            "1. Backend Engineer\n2. Intern",
        ));
        let record = extractor(llm.clone(), Some("sk-test"))
            .extract(RESUME, None)
            .await
            .unwrap();

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.email, "jane.doe@example.com");
        assert_eq!(record.phone, "+1 555 010 2030");
        assert_eq!(record.skills, vec!["Rust", "SQL"]);
        assert_eq!(record.experience, vec!["Backend Engineer", "Intern"]);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_any_call() {
        let llm = Arc::new(ScriptedCompleter::new("Rust", "1. Engineer"));
        let result = extractor(llm.clone(), None).extract(RESUME, Some("  ")).await;

        assert!(matches!(result, Err(ExtractError::MissingCredential)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_explicit_key_overrides_configured_key() {
        let llm = Arc::new(ScriptedCompleter::new("Rust", "1. Engineer"));
        extractor(llm.clone(), Some("sk-configured"))
            .extract(RESUME, Some("sk-explicit"))
            .await
            .unwrap();

        let seen = llm.seen.lock().unwrap();
        assert!(seen.iter().all(|(_, _, _, key)| key == "sk-explicit"));
    }

    #[tokio::test]
    async fn test_requests_are_deterministic_and_capped() {
        let llm = Arc::new(ScriptedCompleter::new("Rust", "1. Engineer"));
        extractor(llm.clone(), Some("sk-test"))
            .extract(RESUME, None)
            .await
            .unwrap();

        let seen = llm.seen.lock().unwrap();
        let mut caps: Vec<u32> = seen.iter().map(|(_, cap, _, _)| *cap).collect();
        caps.sort_unstable();
        assert_eq!(caps, vec![128, 256]);
        assert!(seen.iter().all(|(_, _, temp, _)| *temp == 0.0));
        assert!(seen.iter().all(|(prompt, _, _, _)| prompt.contains("Resume:\nJANE DOE")));
    }

    #[tokio::test]
    async fn test_prompts_carry_truncated_text() {
        let llm = Arc::new(ScriptedCompleter::new("Rust", "1. Engineer"));
        let long_text = "x".repeat(5000);
        extractor(llm.clone(), Some("sk-test"))
            .extract(&long_text, None)
            .await
            .unwrap();

        let seen = llm.seen.lock().unwrap();
        for (prompt, cap, _, _) in seen.iter() {
            let sent = prompt.split("Resume:\n").nth(1).unwrap();
            let expected = if *cap == 128 { 3000 } else { 3500 };
            assert_eq!(sent.chars().count(), expected);
        }
    }

    #[tokio::test]
    async fn test_llm_failure_surfaces_with_field() {
        let llm = Arc::new(ScriptedCompleter {
            fail_experience: true,
            ..ScriptedCompleter::new("Rust", "")
        });
        let err = extractor(llm, Some("sk-test"))
            .extract(RESUME, None)
            .await
            .unwrap_err();

        match err {
            ExtractError::Llm { field, source } => {
                assert_eq!(field, LlmField::Experience);
                assert!(matches!(source, LlmError::Api { status: 429, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_service_times_out() {
        let llm = Arc::new(ScriptedCompleter {
            delay: Some(Duration::from_secs(30)),
            ..ScriptedCompleter::new("Rust", "1. Engineer")
        });
        let err = extractor(llm, Some("sk-test"))
            .extract(RESUME, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Timeout { .. }));
    }
}
