//! Total-experience calculation from date ranges in the experience section.
//!
//! Ranges are parsed, sanity-checked, merged into maximal non-overlapping
//! intervals, and summed. Implausible intervals (pre-1980 starts, spans over
//! 20 years) are treated as parse errors and discarded, not clamped.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use cvsift_core::ZERO_EXPERIENCE;

const MIN_START_YEAR: i32 = 1980;
const MAX_INTERVAL_YEARS: i32 = 20;
const MAX_TOTAL_MONTHS: i32 = 50 * 12;

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<start>(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t)?(?:ember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?|\d{1,2}[-/])\s*\d{4}|\d{4})\s*(?:to|–|-|—|until|upto|through)\s*(?P<end>(?:Present|Now|Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t)?(?:ember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?|\d{1,2}[-/])\s*\d{4}|\d{4}|Present|Now)",
    )
    .unwrap()
});

static PRESENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)present|now").unwrap());

const MONTH_ABBREVS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse one side of a range: "Mar 2019", "March 2019", "03/2019", "03-2019",
/// or a bare "2019" (mapped to January).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if s.chars().all(|c| c.is_ascii_digit()) && s.len() == 4 {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    if let Some((month_part, year_part)) = s.split_once(['/', '-']) {
        let month: u32 = month_part.trim().parse().ok()?;
        let year: i32 = year_part.trim().parse().ok()?;
        if (1..=12).contains(&month) {
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
        return None;
    }

    let mut parts = s.split_whitespace();
    let month_name = parts.next()?.to_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;
    let month_name = if month_name == "sept" {
        "sep".to_string()
    } else {
        month_name
    };
    let month = MONTH_ABBREVS
        .iter()
        .position(|abbr| month_name.starts_with(abbr))
        .map(|i| i as u32 + 1)?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whole calendar months between two dates.
fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

fn collect_intervals(text: &str, today: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut intervals = Vec::new();
    for caps in DATE_RANGE_RE.captures_iter(text) {
        let start_raw = caps.name("start").map_or("", |m| m.as_str());
        let end_raw = caps.name("end").map_or("", |m| m.as_str());

        let Some(start) = parse_date(start_raw) else {
            continue;
        };
        let end = if PRESENT_RE.is_match(end_raw) {
            today
        } else {
            match parse_date(end_raw) {
                Some(d) => d,
                None => continue,
            }
        };

        if end < start {
            continue;
        }
        if start.year() < MIN_START_YEAR {
            continue;
        }
        if end.year() - start.year() > MAX_INTERVAL_YEARS {
            continue;
        }
        intervals.push((start, end));
    }
    intervals
}

fn merge_intervals(mut intervals: Vec<(NaiveDate, NaiveDate)>) -> Vec<(NaiveDate, NaiveDate)> {
    intervals.sort_by_key(|(start, _)| *start);
    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some((_, current_end)) if start <= *current_end => {
                if end > *current_end {
                    *current_end = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Sum the elapsed months of all valid, merged date ranges in the experience
/// text and render "N years and M months".
///
/// The total is capped at the elapsed time between the earliest start and
/// now (overlapping mis-parses cannot exceed real elapsed time) and at an
/// absolute ceiling of 50 years.
pub fn calculate_total_experience(experience_text: &str) -> String {
    total_experience_at(experience_text, Local::now().date_naive())
}

/// Deterministic core of [`calculate_total_experience`].
pub(crate) fn total_experience_at(experience_text: &str, today: NaiveDate) -> String {
    let intervals = collect_intervals(experience_text, today);
    if intervals.is_empty() {
        return ZERO_EXPERIENCE.to_string();
    }

    let merged = merge_intervals(intervals);
    let mut total_months: i32 = merged
        .iter()
        .map(|(start, end)| months_between(*start, *end).max(0))
        .sum();

    let earliest = merged[0].0;
    total_months = total_months.min(months_between(earliest, today).max(0));
    total_months = total_months.min(MAX_TOTAL_MONTHS);

    format!(
        "{} years and {} months",
        total_months / 12,
        total_months % 12
    )
}
