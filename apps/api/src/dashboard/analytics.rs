//! Aggregates over the filtered view, shaped for bar charts.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::ResumeRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceBucket {
    /// Number of experience entries on a record.
    pub entries: usize,
    /// Records with exactly that many entries.
    pub resumes: usize,
}

/// How often each skill string occurs across the records.
///
/// Sorted by count descending; equal counts keep the order in which the
/// skill first appeared. Skills are compared verbatim (`SQL` and `sql` are
/// distinct bars).
pub fn skill_frequency(records: &[&ResumeRecord]) -> Vec<SkillCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for skill in records.iter().flat_map(|r| r.skills.iter()) {
        let entry = counts.entry(skill.as_str()).or_insert_with(|| {
            order.push(skill.as_str());
            0
        });
        *entry += 1;
    }

    let mut ranked: Vec<SkillCount> = order
        .into_iter()
        .map(|skill| SkillCount {
            skill: skill.to_string(),
            count: counts[skill],
        })
        .collect();
    // Stable sort keeps first-appearance order among ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Number of records per experience-entry count, ascending by entry count.
pub fn experience_distribution(records: &[&ResumeRecord]) -> Vec<ExperienceBucket> {
    let mut buckets: BTreeMap<usize, usize> = BTreeMap::new();
    for record in records {
        *buckets.entry(record.experience.len()).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(entries, resumes)| ExperienceBucket { entries, resumes })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(skills: &[&str], experience: usize) -> ResumeRecord {
        ResumeRecord {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: vec!["Role".to_string(); experience],
            ..Default::default()
        }
    }

    #[test]
    fn test_skill_frequency_counts_and_ranks() {
        let a = record(&["Python", "SQL"], 1);
        let b = record(&["Java", "SQL"], 2);
        let c = record(&["SQL", "Python", "Go"], 2);
        let freq = skill_frequency(&[&a, &b, &c]);

        let pairs: Vec<(&str, usize)> = freq.iter().map(|s| (s.skill.as_str(), s.count)).collect();
        assert_eq!(
            pairs,
            vec![("SQL", 3), ("Python", 2), ("Java", 1), ("Go", 1)]
        );
    }

    #[test]
    fn test_duplicate_skills_within_a_record_count_twice() {
        let a = record(&["Rust", "Rust"], 0);
        assert_eq!(
            skill_frequency(&[&a]),
            vec![SkillCount {
                skill: "Rust".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_skill_frequency_of_empty_view() {
        assert!(skill_frequency(&[]).is_empty());
    }

    #[test]
    fn test_experience_distribution_buckets() {
        let a = record(&[], 0);
        let b = record(&[], 2);
        let c = record(&[], 2);
        assert_eq!(
            experience_distribution(&[&b, &a, &c]),
            vec![
                ExperienceBucket { entries: 0, resumes: 1 },
                ExperienceBucket { entries: 2, resumes: 2 },
            ]
        );
    }
}
