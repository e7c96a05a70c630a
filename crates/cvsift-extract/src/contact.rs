//! Contact-channel and location extraction.

use once_cell::sync::Lazy;
use phonenumber::country::Id::IN;
use phonenumber::Mode;
use regex::Regex;

use crate::vocab::GAZETTEER;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]+").unwrap());

static PHONE_CANDIDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\-\s()]{8,}\d").unwrap());

static LINKEDIN_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)?(www\.)?(linkedin\.com/in/[a-zA-Z0-9_-]+)").unwrap());
static LINKEDIN_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin[:\s]+([a-zA-Z0-9_-]+)").unwrap());

static GITHUB_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)?(www\.)?(github\.com/[a-zA-Z0-9_-]+)").unwrap());
static GITHUB_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)github[:\s]+([a-zA-Z0-9_-]+)").unwrap());

/// First standard local@domain.tld match.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First phone candidate that validates with the phone-number library.
///
/// 10-digit candidates with an Indian mobile prefix are tried against the IN
/// region first, then the raw candidate against IN, then without any default
/// region. The first valid number wins, internationally formatted.
pub fn extract_phone(text: &str) -> Option<String> {
    for m in PHONE_CANDIDATE_RE.find_iter(text) {
        let cleaned = m.as_str().trim();
        let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 10 || digits.len() > 15 {
            continue;
        }

        if digits.len() == 10 && matches!(digits.as_bytes()[0], b'6'..=b'9') {
            if let Some(formatted) = validate(&digits, Some(IN)) {
                return Some(formatted);
            }
        }
        if let Some(formatted) = validate(cleaned, Some(IN)) {
            return Some(formatted);
        }
        if let Some(formatted) = validate(cleaned, None) {
            return Some(formatted);
        }
    }
    None
}

fn validate(raw: &str, region: Option<phonenumber::country::Id>) -> Option<String> {
    let number = phonenumber::parse(region, raw).ok()?;
    phonenumber::is_valid(&number)
        .then(|| number.format().mode(Mode::International).to_string())
}

/// LinkedIn profile URL, from a full URL or a "linkedin: username" label.
pub fn extract_linkedin(text: &str) -> Option<String> {
    if let Some(m) = LINKEDIN_URL_RE.find(text) {
        let url = m.as_str();
        return Some(if url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{}", url)
        });
    }
    LINKEDIN_LABEL_RE
        .captures(text)
        .map(|c| format!("https://www.linkedin.com/in/{}", &c[1]))
}

/// GitHub profile URL, from a full URL or a "github: username" label.
pub fn extract_github(text: &str) -> Option<String> {
    if let Some(m) = GITHUB_URL_RE.find(text) {
        let url = m.as_str();
        return Some(if url.starts_with("http") {
            url.to_string()
        } else {
            format!("https://{}", url)
        });
    }
    GITHUB_LABEL_RE
        .captures(text)
        .map(|c| format!("https://github.com/{}", &c[1]))
}

static LOCATION_SKIP_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)•.*?(posting|implementation|configuration|support|issues)",
        r"(?i)\b(experience|skills|education|projects|responsibilities)\b",
        r"(?i)\b(years?|months?)\b.*\b(experience|exp)\b",
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]+",
        r"\+?\d[\d\s\-()]{8,}\d",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static LOCATION_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Address|Location|City|Residence|Place)\s*:?\s*([A-Za-z][A-Za-z\s,]*)")
        .unwrap()
});

static CITY_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z][A-Za-z\s]*),\s*([A-Za-z][A-Za-z\s]*)\b").unwrap());

static CITY_STATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+,\s*[A-Za-z\s]+$").unwrap());

static NON_ALPHA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z\s]").unwrap());

fn is_valid_location(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    if GAZETTEER.iter().any(|place| lowered.contains(place)) {
        return true;
    }
    if candidate.len() > 50 {
        return false;
    }
    CITY_STATE_SHAPE_RE.is_match(candidate.trim())
}

/// Label-based and gazetteer-based location extraction over the first lines
/// of the document.
///
/// `validate_online` is reserved for a network-backed geocoder; no geocoder
/// is wired in this build and the flag is ignored.
pub fn extract_location(text: &str, validate_online: bool) -> Option<String> {
    let _ = validate_online;
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    // Pass 1: labeled locations and City, State shapes.
    for line in lines.iter().take(15) {
        if LOCATION_SKIP_RES.iter().any(|re| re.is_match(line)) {
            continue;
        }

        if let Some(caps) = LOCATION_LABEL_RE.captures(line) {
            let value = caps[2].trim().to_string();
            if is_valid_location(&value) {
                return Some(value);
            }
        }

        if let Some(caps) = CITY_STATE_RE.captures(line) {
            let candidate = format!("{}, {}", caps[1].trim(), caps[2].trim());
            if is_valid_location(&candidate) {
                return Some(candidate);
            }
        }
    }

    // Pass 2: bare gazetteer hits word-by-word.
    for line in lines.iter().take(10) {
        if LOCATION_SKIP_RES.iter().any(|re| re.is_match(line)) {
            continue;
        }
        for word in line.split_whitespace() {
            let cleaned = NON_ALPHA_RE.replace_all(word, "").trim().to_lowercase();
            if cleaned.len() > 3 && GAZETTEER.contains(cleaned.as_str()) {
                return Some(word.trim_matches(|c: char| !c.is_alphabetic()).to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_first_match() {
        let text = "Contact: jane.doe@example.com / other@foo.org";
        assert_eq!(extract_email(text).as_deref(), Some("jane.doe@example.com"));
    }

    #[test]
    fn email_absent() {
        assert_eq!(extract_email("no contact details here"), None);
    }

    #[test]
    fn phone_ten_digit_mobile_prefix_gets_country_code() {
        let formatted = extract_phone("Mobile: 9876543210").expect("valid number");
        assert!(formatted.starts_with("+91"), "got {formatted}");
    }

    #[test]
    fn phone_with_separators_validates() {
        let formatted = extract_phone("call +91 98765-43210 anytime").expect("valid number");
        assert!(formatted.starts_with("+91"), "got {formatted}");
    }

    #[test]
    fn phone_rejects_short_digit_runs() {
        assert_eq!(extract_phone("id 12345 and 123456789"), None);
    }

    #[test]
    fn linkedin_full_url() {
        let text = "see www.linkedin.com/in/jane-doe for details";
        assert_eq!(
            extract_linkedin(text).as_deref(),
            Some("https://www.linkedin.com/in/jane-doe")
        );
    }

    #[test]
    fn linkedin_label_form_synthesizes_url() {
        assert_eq!(
            extract_linkedin("LinkedIn: janedoe").as_deref(),
            Some("https://www.linkedin.com/in/janedoe")
        );
    }

    #[test]
    fn github_full_url_keeps_scheme() {
        assert_eq!(
            extract_github("https://github.com/janedoe").as_deref(),
            Some("https://github.com/janedoe")
        );
    }

    #[test]
    fn github_label_form() {
        assert_eq!(
            extract_github("GitHub janedoe").as_deref(),
            Some("https://github.com/janedoe")
        );
    }

    #[test]
    fn location_city_state_with_gazetteer_hit() {
        let text = "Jane Doe\nPune, Maharashtra\njane@example.com";
        assert_eq!(
            extract_location(text, false).as_deref(),
            Some("Pune, Maharashtra")
        );
    }

    #[test]
    fn location_labeled() {
        let text = "Jane Doe\nLocation: Hyderabad\n";
        assert_eq!(extract_location(text, false).as_deref(), Some("Hyderabad"));
    }

    #[test]
    fn location_bare_gazetteer_word() {
        let text = "Jane Doe\nBased in Chennai currently\n";
        assert_eq!(extract_location(text, false).as_deref(), Some("Chennai"));
    }

    #[test]
    fn location_skips_responsibility_lines() {
        let text = "• handled posting and configuration in Pune office\nunrelated line";
        assert_eq!(extract_location(text, false), None);
    }
}
