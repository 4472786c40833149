// Field extraction LLM prompt templates.

/// Characters of résumé text sent with the skills prompt.
pub const SKILLS_TEXT_LIMIT: usize = 3000;
pub const SKILLS_MAX_TOKENS: u32 = 128;

/// Characters of résumé text sent with the experience prompt.
pub const EXPERIENCE_TEXT_LIMIT: usize = 3500;
pub const EXPERIENCE_MAX_TOKENS: u32 = 256;

pub const SKILLS_PROMPT: &str = "\
Extract all relevant technical and soft skills mentioned in this resume. \
List only the skills, separated by commas. Do not include extra text.\n\n\
Resume:\n{resume_text}";

pub const EXPERIENCE_PROMPT: &str = "\
From this resume, extract up to 10 concise role or position titles \
the person has held in work experience or projects. Return as a numbered list.\n\n\
Resume:\n{resume_text}";
