//! Candidate name detection.
//!
//! Two stages, in fixed priority order:
//! 1. An all-caps 2–3 token line among the first five lines (a printed name header).
//! 2. The first `Person` entity reported by a `NameRecognizer` over the full text.
//!
//! `FieldExtractor` carries an `Arc<dyn NameRecognizer>`; the default backend is
//! `CapitalizedNameRecognizer`.

/// Lines from the top of the document inspected for an all-caps header.
const HEADER_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
}

/// A labelled span reported by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

/// Named-entity recognition seam. Implement this to plug in a different model.
pub trait NameRecognizer: Send + Sync {
    /// Entities in document order.
    fn recognize(&self, text: &str) -> Vec<Entity>;
}

/// Returns the candidate's name, or an empty string when nothing matches.
pub fn extract_name(text: &str, recognizer: &dyn NameRecognizer) -> String {
    if let Some(header) = all_caps_header(text) {
        return header;
    }

    recognizer
        .recognize(text)
        .into_iter()
        .find(|e| e.label == EntityLabel::Person)
        .map(|e| e.text)
        .unwrap_or_default()
}

fn all_caps_header(text: &str) -> Option<String> {
    text.trim()
        .lines()
        .take(HEADER_LINES)
        .find(|line| {
            let tokens = line.split_whitespace().count();
            (tokens == 2 || tokens == 3) && is_upper(line)
        })
        .map(|line| title_case(line.trim()))
}

/// True when the line has at least one cased character and none in lower case.
fn is_upper(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest,
/// so `O'NEIL` becomes `O'Neil` and `JEAN-LUC` becomes `Jean-Luc`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_alphabetic();
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// CapitalizedNameRecognizer: default local backend
// ────────────────────────────────────────────────────────────────────────────

/// Words that start with a capital in résumés but are not part of a person's name.
const NON_NAME_WORDS: &[&str] = &[
    "about", "academic", "achievements", "activities", "address", "analyst", "and",
    "april", "architect", "august", "awards", "bachelor", "certifications", "college",
    "computer", "consultant", "contact", "curriculum",
    "data", "december", "department", "designer", "developer", "director", "education",
    "email", "employment", "engineer", "engineering", "experience", "february",
    "freelance", "full", "history", "institute", "intern", "january", "july",
    "june", "languages", "lead", "linkedin", "manager", "march",
    "master", "may", "mobile", "november", "objective", "october", "phone", "present",
    "professional", "profile", "projects", "references", "resume", "school", "science",
    "senior", "september", "skills", "software", "stack", "street", "summary",
    "technical", "technologies", "the", "university", "vitae", "work",
];

/// Words that close a company name, such as `Acme Corp`.
const ORGANIZATION_SUFFIXES: &[&str] = &[
    "co", "company", "corp", "corporation", "inc", "limited", "ltd",
];

/// Labels runs of two or three consecutive capitalised words: `Organization`
/// when the run contains a company suffix, `Person` otherwise. Runs are broken
/// by common résumé vocabulary.
///
/// This is a heuristic stand-in for a statistical NER model: it favours the
/// name-shaped phrases that typically open a résumé and reports every
/// candidate in document order.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapitalizedNameRecognizer;

impl NameRecognizer for CapitalizedNameRecognizer {
    fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for line in text.lines() {
            let mut run: Vec<&str> = Vec::new();
            for token in line.split_whitespace() {
                let word = token.trim_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '|'));
                if is_name_word(word) {
                    run.push(word);
                    // Punctuation after a word closes the run.
                    if word.len() != token.len() {
                        flush_run(&mut run, &mut entities);
                    }
                } else {
                    flush_run(&mut run, &mut entities);
                }
            }
            flush_run(&mut run, &mut entities);
        }
        entities
    }
}

fn flush_run(run: &mut Vec<&str>, entities: &mut Vec<Entity>) {
    if (2..=3).contains(&run.len()) {
        let label = if run.iter().any(|w| is_organization_suffix(w)) {
            EntityLabel::Organization
        } else {
            EntityLabel::Person
        };
        entities.push(Entity {
            text: run.join(" "),
            label,
        });
    }
    run.clear();
}

fn is_organization_suffix(word: &str) -> bool {
    ORGANIZATION_SUFFIXES.contains(&word.to_lowercase().as_str())
}

/// `Jane`, `O'Neil`, `Jean-Luc`: a capital followed by at least one lower-case letter.
fn is_name_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    let rest: Vec<char> = chars.collect();
    if !rest.iter().any(|c| c.is_lowercase()) {
        return false;
    }
    if !rest
        .iter()
        .all(|c| c.is_alphabetic() || *c == '\'' || *c == '-')
    {
        return false;
    }
    !NON_NAME_WORDS.contains(&word.to_lowercase().as_str())
}
