//! Contact details: best-effort regex matches, never errors.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w\.-]+@[\w\.-]+").expect("email pattern is valid"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s\-]{8,}\d").expect("phone pattern is valid"));

/// First `local@domain`-shaped token, or an empty string.
pub fn extract_email(text: &str) -> String {
    first_match(&EMAIL_RE, text)
}

/// First phone-like digit run (optional `+`, at least 10 digits/spaces/dashes),
/// or an empty string.
pub fn extract_phone(text: &str) -> String {
    first_match(&PHONE_RE, text)
}

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
