//! Curated word tables backing the heuristic extractors.
//!
//! All tables are process-wide, lazily-initialized and read-only thereafter;
//! extending a taxonomy means editing data here, not control flow elsewhere.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// English stop words (the NLTK list), used to reject non-skill tokens.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
        "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
        "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
        "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
        "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
        "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
        "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

/// Words that disqualify a token from being a skill: role words, soft-skill
/// words, location and language names, generic resume vocabulary.
pub static JUNK_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "skills", "tools", "technologies", "services", "languages", "systems", "expertise",
        "responsibilities", "projects", "summary", "roles", "role", "team", "teams",
        "functional", "applications", "application", "platforms", "frameworks", "experience",
        "methodologies", "used", "use", "using", "proficient", "knowledge", "worked",
        "responsible", "designing", "developing", "testing", "managing", "created", "performed",
        "maintaining", "executing", "engineer", "engineered", "helped", "understanding", "done",
        "skills.", "communication", "problem", "teamwork", "collaboration", "leadership",
        "interpersonal", "thinking", "adaptability", "attention", "critical", "self", "fast",
        "quick", "learning", "and", "between", "to", "from", "till", "since", "before", "after",
        "year", "years", "etc", "etc.", "version", "control", "expert", "company", "client",
        "project", "organization", "details", "working", "environment", "task",
        "responsibility", "objective", "goal",
        // Location names that leak into skills sections
        "pune", "mumbai", "delhi", "bangalore", "hyderabad", "chennai", "kolkata", "india",
        "maharashtra", "karnataka", "gujarat", "rajasthan", "tamil nadu", "west bengal",
        // Job titles and roles
        "lecturer", "professor", "manager", "developer", "analyst", "consultant",
        "coordinator", "specialist", "executive", "officer", "director", "lead", "senior",
        "junior",
        // Common non-skill terms
        "bank", "coordination", "organizational", "confidently", "typing", "wpm", "english",
        "hindi", "marathi", "tamil", "telugu", "gujarati", "bengali",
    ]
    .into_iter()
    .collect()
});

/// Known technology terms, lower-cased. A token in this set is kept and
/// upper-cased in the output.
pub static TECH_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "aws", "azure", "gcp", "docker", "kubernetes", "helm", "terraform", "ansible",
        "jenkins", "git", "gitlab", "python", "java", "javascript", "typescript", "node.js",
        "go", "golang", "ruby", "php", "c", "c++", "c#", "react", "angular", "vue", "next.js",
        "nuxt", "redux", "html", "css", "sass", "less", "bootstrap", "sql", "mysql",
        "postgresql", "postgres", "oracle", "mongodb", "hive", "spark", "hadoop", "pyspark",
        "selenium", "pytest", "junit", "testng", "cypress", "playwright", "jmeter", "rest",
        "rest api", "graphql", "soap", "microservices", "ci/cd", "api", "pandas", "numpy",
        "scikit-learn", "sklearn", "tensorflow", "pytorch", "nlp", "eda", "linux", "windows",
        "macos", "bash", "shell", "powershell", "jira", "confluence", "sap", "abap", "hana",
        "s/4hana", "fico", "mm", "sd", "pp", "tableau", "power bi", "spring", "hibernate",
        "maven", "gradle", "mockito", "kafka", "redis", "elasticsearch", "kibana", "logstash",
        "grafana", "prometheus", "splunk",
    ]
    .into_iter()
    .collect()
});

/// Acronyms always emitted fully upper-cased.
pub static FORCE_UPPER: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "SQL", "HTML", "CSS", "AWS", "GCP", "EDA", "CNN", "RNN", "QA", "REST", "CI/CD", "API",
        "SAP", "ABAP",
    ]
    .into_iter()
    .collect()
});

/// Company-name suffixes; a token containing one is an employer, not a skill.
pub static COMPANY_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "technologies", "solutions", "labs", "pvt", "ltd", "inc", "llc", "limited",
        "corporation", "corp",
    ]
    .into_iter()
    .collect()
});

/// Leading verbs that mark a token as a responsibility sentence.
pub static VERB_CLUES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "implemented", "designed", "developed", "built", "created", "managed", "led", "leading",
        "owning", "driving", "improved", "optimized", "maintained", "executed",
    ]
    .into_iter()
    .collect()
});

/// Job-title vocabulary used to disqualify name candidates.
pub static JOB_TITLE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "senior", "junior", "lead", "software", "engineer", "developer", "manager", "director",
        "analyst", "specialist", "consultant", "administrator", "coordinator", "assistant",
        "associate", "executive", "officer", "president", "head", "chief", "test", "quality",
        "assurance", "designer", "architect", "technician", "support", "professional",
        "experience", "intern", "trainee", "dev", "qa", "sdet",
    ]
    .into_iter()
    .collect()
});

/// Section-header phrases that terminate the preamble during name scoring.
pub static SECTION_HEADER_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "profile", "summary", "objective", "about me", "professional summary",
        "profile summary", "skills", "technical skills", "key skills", "competencies",
        "expertise", "experience", "professional experience", "work experience",
        "employment history", "projects", "achievements", "certifications", "education",
        "references", "personal data", "personal details",
        // Treated as headers so the preface stops early
        "resume", "curriculum vitae", "biodata", "bio-data",
    ]
    .into_iter()
    .collect()
});

/// Phrases that can never be a name (checked with and without spaces to
/// survive OCR joins).
pub static SKIP_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["resume", "curriculum vitae", "curriculumvitae", "cv", "bio-data", "biodata"]
        .into_iter()
        .collect()
});

/// Tokens on the first line that end name accumulation: technology, role,
/// and seniority markers common in "Name — Role" headlines.
pub static FIRST_LINE_BREAKERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "SAP", "S/4HANA", "HANA", "ABAP", "SD", "MM", "PP", "FICO", "CONSULTANT", "ENGINEER",
        "DEVELOPER", "MANAGER", "ARCHITECT", "LEAD", "SR", "JR", "SENIOR", "JUNIOR", "ADMIN",
        "ADMINISTRATOR",
    ]
    .into_iter()
    .collect()
});

/// Gazetteer of Indian city and state names used to validate locations.
pub static GAZETTEER: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mumbai", "delhi", "bangalore", "hyderabad", "chennai", "kolkata", "pune", "ahmedabad",
        "surat", "jaipur", "lucknow", "kanpur", "nagpur", "indore", "maharashtra", "karnataka",
        "tamil nadu", "gujarat", "rajasthan", "uttar pradesh", "west bengal", "telangana",
        "andhra pradesh", "kerala", "madhya pradesh",
    ]
    .into_iter()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_initialize_once_and_contain_expected_entries() {
        assert!(STOP_WORDS.contains("the"));
        assert!(JUNK_KEYWORDS.contains("teamwork"));
        assert!(TECH_TERMS.contains("python"));
        assert!(FORCE_UPPER.contains("CI/CD"));
        assert!(JOB_TITLE_WORDS.contains("engineer"));
        assert!(GAZETTEER.contains("pune"));
    }
}
