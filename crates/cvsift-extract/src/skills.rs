//! Skill-token classification against the curated vocabulary.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::vocab::{
    COMPANY_SUFFIXES, FORCE_UPPER, JUNK_KEYWORDS, STOP_WORDS, TECH_TERMS, VERB_CLUES,
};

static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;/|]").unwrap());
static ALLOWED_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9+#./_\- ]+$").unwrap());
static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec|January|February|March|April|June|July|August|September|October|November|December)\b").unwrap()
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// Lower-cased multi-word acronyms kept upper inside title-cased phrases.
static INLINE_UPPER: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["ci/cd", "api", "sql"].into_iter().collect());

/// A 2-4 word run of Title-cased words with no technology term among them is
/// treated as a personal name, not a skill.
fn is_person_name(token: &str) -> bool {
    let words: Vec<&str> = token.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    let shaped = words.iter().all(|w| {
        if w.chars().all(|c| c.is_alphabetic()) {
            let mut chars = w.chars();
            chars.next().is_some_and(|c| c.is_uppercase())
                && chars.all(|c| c.is_lowercase())
        } else {
            true
        }
    });
    if !shaped {
        return false;
    }
    !words
        .iter()
        .any(|w| TECH_TERMS.contains(w.to_lowercase().as_str()))
}

/// Token-level accept/reject rules. Anything that smells like a sentence, a
/// date, an employer, or a person is dropped.
fn is_short_tech_token(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    let words: Vec<&str> = token.split_whitespace().collect();
    if words.len() > 4 {
        return false;
    }
    if !ALLOWED_CHARS_RE.is_match(token) {
        return false;
    }
    if token.ends_with('.') && words.len() > 3 {
        return false;
    }
    if MONTH_RE.is_match(token) || YEAR_RE.is_match(token) {
        return false;
    }
    let lowered = token.to_lowercase();
    if STOP_WORDS.contains(lowered.as_str()) || JUNK_KEYWORDS.contains(lowered.as_str()) {
        return false;
    }
    if NUMERIC_RE.is_match(token) {
        return false;
    }
    if words.len() == 1 && (lowered.ends_with("ing") || lowered.ends_with("ed")) {
        return false;
    }
    let lowered_words: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    if lowered_words
        .iter()
        .any(|w| COMPANY_SUFFIXES.contains(w.as_str()))
    {
        return false;
    }
    if lowered_words
        .first()
        .is_some_and(|w| VERB_CLUES.contains(w.as_str()))
    {
        return false;
    }
    !is_person_name(token)
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn cased(token: &str) -> String {
    let upper = token.to_uppercase();
    let lowered = token.to_lowercase();
    if FORCE_UPPER.contains(upper.as_str()) || TECH_TERMS.contains(lowered.as_str()) {
        return upper;
    }
    if token.split_whitespace().count() > 1 {
        token
            .split_whitespace()
            .map(|w| {
                if INLINE_UPPER.contains(w.to_lowercase().as_str()) {
                    w.to_uppercase()
                } else {
                    title_case_word(w)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        title_case_word(token)
    }
}

/// Extract a de-duplicated (case-insensitive), order-preserving skill list
/// from arbitrary section text.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result: Vec<String> = Vec::new();

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let cleaned_line = PAREN_RE.replace_all(line, "");
        for token in SEPARATOR_RE.split(&cleaned_line) {
            for sub in token.split(':') {
                let value = sub.trim().trim_matches(|c: char| "-•| ".contains(c));
                if value.is_empty() || !is_short_tech_token(value) {
                    continue;
                }
                let skill = cased(value);
                let key = skill.to_lowercase();
                if seen.insert(key) {
                    result.push(skill);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separators_and_cases_tokens() {
        let skills = extract_skills("Python, java; Docker | kubernetes");
        assert_eq!(skills, vec!["PYTHON", "JAVA", "DOCKER", "KUBERNETES"]);
    }

    #[test]
    fn dedup_is_case_insensitive_first_seen() {
        let skills = extract_skills("Pascal\npascal, PASCAL");
        assert_eq!(skills, vec!["Pascal"]);
    }

    #[test]
    fn force_upper_acronyms() {
        let skills = extract_skills("sql, html, css");
        assert_eq!(skills, vec!["SQL", "HTML", "CSS"]);
    }

    #[test]
    fn rejects_sentences_and_dates() {
        let skills = extract_skills(
            "worked on large distributed systems since Jan 2019\n2021\nimplemented caching layer",
        );
        assert!(skills.is_empty(), "got {skills:?}");
    }

    #[test]
    fn rejects_stop_words_and_junk() {
        let skills = extract_skills("and, the, teamwork, communication, leadership");
        assert!(skills.is_empty(), "got {skills:?}");
    }

    #[test]
    fn rejects_participles_and_company_names() {
        let skills = extract_skills("testing, managed, Acme Technologies, Initech Pvt Ltd");
        assert!(skills.is_empty(), "got {skills:?}");
    }

    #[test]
    fn rejects_person_names_but_keeps_tech_phrases() {
        // "Rahul Sharma" is name-shaped with no tech term; "POWER BI" is not
        // title-shaped and resolves through the tech-term vocabulary.
        let skills = extract_skills("Rahul Sharma, POWER BI");
        assert_eq!(skills, vec!["POWER BI"]);
    }

    #[test]
    fn strips_parentheticals_and_bullets() {
        let skills = extract_skills("• Python (3 years), Terraform (IaC)");
        assert_eq!(skills, vec!["PYTHON", "TERRAFORM"]);
    }

    #[test]
    fn label_prefix_is_filtered_by_junk_table() {
        let skills = extract_skills("Languages: Python, Java");
        assert_eq!(skills, vec!["PYTHON", "JAVA"]);
    }

    #[test]
    fn multi_word_title_casing_with_inline_acronyms() {
        let skills = extract_skills("data engineering pipelines, api gateway design");
        assert_eq!(
            skills,
            vec!["Data Engineering Pipelines", "API Gateway Design"]
        );
    }
}
