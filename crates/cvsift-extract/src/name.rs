//! Candidate-name extraction.
//!
//! Five strategies run in priority order, each a pure function returning an
//! optional candidate; the first success wins. The scoring strategy keeps its
//! weights as named constants so they stay tunable without code changes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::vocab::{FIRST_LINE_BREAKERS, JOB_TITLE_WORDS, SECTION_HEADER_PHRASES, SKIP_PHRASES};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]+").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\-\s()]{7,}\d").unwrap());
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?(linkedin|github)\.com/[a-z0-9/_-]+").unwrap()
});

/// "Name: ..." / "Full Name - ..." label line, optionally bulleted.
static NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:[•*●■▪❖\-–—]?\s*)?(?:name|full\s*name)\s*[:\-–—]\s*(.*)$").unwrap()
});

/// Name shape: Capitalized words, ALL-CAPS words, or initials + surname.
static NAME_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,5})|(?:[A-Z]{2,}(?:\s+[A-Z]{2,}){1,5})|(?:(?:[A-Z]\.\s*){1,3}[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?))$",
    )
    .unwrap()
});

static NON_NAME_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z .'\-]").unwrap());
static NAME_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z.\-']*$").unwrap());
static MULTI_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Scoring weights for the preamble strategy.
const SHAPE_MATCH_BONUS: f64 = 4.0;
const TWO_THREE_TOKEN_BONUS: f64 = 2.0;
const FOUR_TOKEN_BONUS: f64 = 1.0;
const ODD_TOKEN_COUNT_PENALTY: f64 = -1.0;
const TITLE_TOKEN_BONUS: f64 = 0.3;
const ALL_CAPS_TOKEN_BONUS: f64 = 0.4;
const JOB_TITLE_PENALTY: f64 = -2.5;
const NOISE_PENALTY: f64 = -5.0;
const POSITION_BASE: f64 = 2.0;
const POSITION_DECAY: f64 = 0.15;

fn clean_candidate(line: &str) -> String {
    let collapsed = MULTI_WS_RE.replace_all(line.trim(), " ");
    collapsed
        .trim_matches(|c: char| "•|-_—:; ".contains(c))
        .to_string()
}

fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

fn is_skip_phrase(line: &str) -> bool {
    let lowered = line
        .trim()
        .to_lowercase()
        .trim_matches(|c: char| "-:•| ".contains(c))
        .to_string();
    if lowered.is_empty() {
        return false;
    }
    SKIP_PHRASES.contains(lowered.as_str())
        || SKIP_PHRASES.contains(lowered.replace(' ', "").as_str())
}

fn is_section_header(line: &str) -> bool {
    let lowered = line.trim().to_lowercase();
    let lowered = lowered.trim_end_matches(':');
    SECTION_HEADER_PHRASES.contains(lowered)
}

/// Contact info, digits, or symbol noise: never part of a name.
fn is_noise_line(line: &str) -> bool {
    if is_skip_phrase(line) {
        return true;
    }
    if EMAIL_RE.is_match(line) || PHONE_RE.is_match(line) || URL_RE.is_match(line) {
        return true;
    }
    if line.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    line.chars().any(|c| "/\\@#%^*_+=[]{}<>".contains(c))
}

fn has_job_title_tokens(line: &str) -> bool {
    tokenize(line)
        .iter()
        .any(|t| JOB_TITLE_WORDS.contains(t.to_lowercase().as_str()))
}

fn is_name_shape(candidate: &str) -> bool {
    let cleaned = clean_candidate(candidate);
    if cleaned.len() < 2 || cleaned.len() > 120 {
        return false;
    }
    if NON_NAME_CHAR_RE.is_match(&cleaned) {
        return false;
    }
    NAME_SHAPE_RE.is_match(&cleaned)
}

/// Keep only tokens that look like name words (letters with optional
/// internal punctuation). Tokens are kept verbatim.
fn normalize_name_tokens<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|t| {
            let stripped = t.trim_matches(|c: char| ".-'".contains(c));
            !stripped.is_empty() && NAME_TOKEN_RE.is_match(t)
        })
        .copied()
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    let mut has_alpha = false;
    for c in token.chars() {
        if c.is_alphabetic() {
            has_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_alpha
}

fn is_title_cased(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    let rest: Vec<char> = chars.collect();
    rest.iter().any(|c| c.is_lowercase()) && !rest.iter().any(|c| c.is_uppercase())
}

/// Strategy 1: accumulate leading name tokens of the first line, stopping at
/// the first role/technology/degree token. Handles "Jane Doe — Senior
/// Software Engineer" headlines.
fn from_first_line_with_role(lines: &[String]) -> Option<String> {
    let first = clean_candidate(lines.first()?);
    if first.is_empty() || is_noise_line(&first) {
        return None;
    }

    let mut name_tokens: Vec<&str> = Vec::new();
    for token in tokenize(&first) {
        let breaker = FIRST_LINE_BREAKERS.contains(token.to_uppercase().as_str())
            || token.chars().any(|c| c.is_ascii_digit())
            || token.contains('/')
            || (is_all_caps(token) && token.chars().count() > 2)
            || JOB_TITLE_WORDS.contains(token.to_lowercase().as_str());
        if breaker {
            break;
        }
        if NAME_TOKEN_RE.is_match(token) {
            name_tokens.push(token);
        } else {
            break;
        }
    }

    match name_tokens.len() {
        1 => {
            let token = name_tokens[0];
            let capitalized = token.chars().next().is_some_and(|c| c.is_uppercase());
            if capitalized && !JOB_TITLE_WORDS.contains(token.to_lowercase().as_str()) {
                Some(token.to_string())
            } else {
                None
            }
        }
        2 => {
            let candidate = name_tokens.join(" ");
            is_name_shape(&candidate).then_some(candidate)
        }
        _ => None,
    }
}

/// Strategy 2: an explicit "Name:" label, possibly with the value spilling
/// onto the following lines.
fn from_labeled_block(lines: &[String], idx: usize) -> Option<String> {
    let caps = NAME_LABEL_RE.captures(&lines[idx])?;
    let remainder = clean_candidate(caps.get(1).map_or("", |m| m.as_str()));

    let accept = |candidate: &str| -> Option<String> {
        let tokens = normalize_name_tokens(&tokenize(candidate));
        if (2..=6).contains(&tokens.len()) {
            let joined = tokens.join(" ");
            if !has_job_title_tokens(&joined) && is_name_shape(&joined) {
                return Some(joined);
            }
        }
        None
    };

    // Empty or single-token remainder: borrow up to two following lines.
    if remainder.is_empty() || tokenize(&remainder).len() < 2 {
        for next in lines.iter().skip(idx + 1).take(2) {
            let next = clean_candidate(next);
            if next.is_empty() || is_noise_line(&next) || is_section_header(&next) {
                continue;
            }
            let candidate = if remainder.is_empty() {
                next.clone()
            } else {
                format!("{} {}", remainder, next)
            };
            if let Some(name) = accept(&candidate) {
                return Some(name);
            }
        }
    }

    if let Some(name) = accept(&remainder) {
        return Some(name);
    }

    // A lone token on the label line joined with the next usable line.
    let remainder_tokens = normalize_name_tokens(&tokenize(&remainder));
    if remainder_tokens.len() == 1 {
        for next in lines.iter().skip(idx + 1).take(2) {
            let next = clean_candidate(next);
            if next.is_empty() || is_noise_line(&next) || is_section_header(&next) {
                continue;
            }
            let mut merged: Vec<&str> = remainder_tokens.clone();
            merged.extend(normalize_name_tokens(&tokenize(&next)));
            merged.truncate(6);
            if merged.len() >= 2 {
                let candidate = merged.join(" ");
                if !has_job_title_tokens(&candidate) && is_name_shape(&candidate) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

fn score_candidate(line: &str, index_weight: f64) -> f64 {
    let candidate = clean_candidate(line);
    let tokens = tokenize(&candidate);
    let mut score = 0.0;

    if NAME_SHAPE_RE.is_match(&candidate) {
        score += SHAPE_MATCH_BONUS;
    }
    score += match tokens.len() {
        2 | 3 => TWO_THREE_TOKEN_BONUS,
        4 => FOUR_TOKEN_BONUS,
        _ => ODD_TOKEN_COUNT_PENALTY,
    };
    let title_tokens = tokens.iter().filter(|t| is_title_cased(t)).count();
    let caps_tokens = tokens
        .iter()
        .filter(|t| is_all_caps(t) && t.chars().count() > 1)
        .count();
    score += TITLE_TOKEN_BONUS * title_tokens as f64;
    score += ALL_CAPS_TOKEN_BONUS * caps_tokens as f64;
    if has_job_title_tokens(&candidate) {
        score += JOB_TITLE_PENALTY;
    }
    if is_noise_line(&candidate) {
        score += NOISE_PENALTY;
    }
    score + index_weight
}

/// Lines before the first recognized section header (capped at 12), falling
/// back to the first 12 lines when no header exists.
fn preamble(lines: &[String]) -> Vec<String> {
    let mut preface: Vec<String> = Vec::new();
    for line in lines.iter().take(60) {
        if is_section_header(line) {
            break;
        }
        preface.push(line.clone());
    }
    if preface.is_empty() {
        preface = lines.iter().take(12).cloned().collect();
    } else {
        preface.truncate(12);
    }
    preface
}

/// Strategy 3: score every name-shaped preamble line and keep the best.
fn from_preamble_scoring(preface: &[String]) -> Option<String> {
    let mut best: Option<String> = None;
    let mut best_score = f64::NEG_INFINITY;
    for (idx, line) in preface.iter().enumerate() {
        let candidate = clean_candidate(line);
        if candidate.is_empty()
            || is_noise_line(&candidate)
            || has_job_title_tokens(&candidate)
            || is_section_header(&candidate)
            || is_skip_phrase(&candidate)
            || !is_name_shape(&candidate)
        {
            continue;
        }
        let index_weight = POSITION_BASE - idx as f64 * POSITION_DECAY;
        let score = score_candidate(&candidate, index_weight);
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }
    best
}

/// Strategy 4: loose last resort over the first preamble lines with
/// job-title tokens stripped out.
fn from_loose_fallback(preface: &[String]) -> Option<String> {
    for line in preface.iter().take(5) {
        if is_noise_line(line) || is_section_header(line) || is_skip_phrase(line) {
            continue;
        }
        let tokens: Vec<&str> = normalize_name_tokens(&tokenize(line))
            .into_iter()
            .filter(|t| !JOB_TITLE_WORDS.contains(t.to_lowercase().as_str()))
            .collect();
        if (2..=6).contains(&tokens.len()) {
            let candidate = tokens[..tokens.len().min(4)].join(" ");
            if !is_skip_phrase(&candidate) && is_name_shape(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Extract a name via layered heuristics: first-line role split, labeled
/// block, preamble scoring, loose fallback. Returns `"Unknown"` when every
/// strategy misses.
pub fn extract_name(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return "Unknown".to_string();
    }

    if let Some(name) = from_first_line_with_role(&lines) {
        return name;
    }

    for idx in 0..lines.len().min(40) {
        if NAME_LABEL_RE.is_match(&lines[idx]) {
            if let Some(name) = from_labeled_block(&lines, idx) {
                return name;
            }
        }
    }

    let preface = preamble(&lines);
    if let Some(name) = from_preamble_scoring(&preface) {
        return name;
    }
    if let Some(name) = from_loose_fallback(&preface) {
        return name;
    }

    let first = clean_candidate(&lines[0]);
    if is_name_shape(&first) && !is_section_header(&first) && !is_skip_phrase(&first) {
        return first;
    }
    "Unknown".to_string()
}

/// Pick between the names extracted from the two engine texts: prefer the
/// non-Unknown one, otherwise the longer string (more tokens retained is
/// treated as more complete).
pub fn resolve_name(primary: String, secondary: String) -> String {
    if primary == secondary || secondary == "Unknown" {
        return primary;
    }
    if primary == "Unknown" {
        return secondary;
    }
    if primary.len() >= secondary.len() {
        primary
    } else {
        secondary
    }
}
