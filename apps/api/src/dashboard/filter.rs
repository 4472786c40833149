use serde::{de, Deserialize, Deserializer, Serialize};

use crate::models::ResumeRecord;

/// Search predicates applied to the stored records. All present predicates
/// must hold; absent or blank ones are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ResumeFilter {
    /// Case-insensitive substring of the candidate name.
    pub name: Option<String>,
    /// Case-insensitive substring of the skills flattened with `", "`.
    pub skill: Option<String>,
    /// Minimum number of experience entries; 0 or blank disables the predicate.
    #[serde(deserialize_with = "blank_as_zero")]
    pub min_experience: usize,
}

/// Query values arrive as text; an empty value means the predicate is unset.
fn blank_as_zero<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(de::Error::custom)
}

impl ResumeFilter {
    pub fn matches(&self, record: &ResumeRecord) -> bool {
        if let Some(needle) = non_blank(&self.name) {
            if !contains_ignore_case(&record.name, needle) {
                return false;
            }
        }
        if let Some(needle) = non_blank(&self.skill) {
            if !contains_ignore_case(&record.skills_display(), needle) {
                return false;
            }
        }
        self.min_experience == 0 || record.experience.len() >= self.min_experience
    }

    /// Keeps matching records in their stored order.
    pub fn apply<'a>(&self, records: &'a [ResumeRecord]) -> Vec<&'a ResumeRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
