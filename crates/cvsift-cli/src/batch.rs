//! Batch mode: walk a directory of PDFs, write one JSON record per file,
//! and relocate source files whose output trips the post-hoc suspect rules.

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;

use cvsift_ingest::ResumeRecord;

/// A record is suspect when its name or skills look like a mis-parse:
/// empty skills, more name tokens than a real name carries, or a name that
/// does not start with a letter.
pub(crate) fn is_suspect(record: &ResumeRecord) -> bool {
    let name = record.personal_info.name.trim();
    let starts_bad = !name.chars().next().is_some_and(|c| c.is_alphabetic());
    let too_many_tokens = name.split_whitespace().count() > 3;
    let empty_skills = record.skills.is_empty();
    starts_bad || too_many_tokens || empty_skills
}

/// File-system-safe stem for the output filename, derived from the
/// extracted name or falling back to the source stem.
pub(crate) fn safe_stem(record: &ResumeRecord, source: &Path) -> String {
    let fallback = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "resume".to_string());

    let name = record.personal_info.name.trim();
    let base = if name.is_empty() || name.eq_ignore_ascii_case("unknown") {
        fallback.clone()
    } else {
        name.to_string()
    };

    let mut cleaned = String::new();
    let mut last_was_sep = true;
    for c in base.chars() {
        if c.is_ascii_alphanumeric() {
            cleaned.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            cleaned.push('_');
            last_was_sep = true;
        }
    }
    let cleaned = cleaned.trim_matches('_').to_string();
    if cleaned.is_empty() {
        fallback
    } else {
        cleaned
    }
}

/// Destination path in `dir` for `file_name`, suffixed on collision.
fn collision_free(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let ext = Path::new(file_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut suffix = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{suffix}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

pub(crate) fn run(
    input_dir: &Path,
    out_dir: &Path,
    suspect_dir: &Path,
    color: bool,
) -> anyhow::Result<()> {
    if !input_dir.is_dir() {
        anyhow::bail!("input directory not found: {}", input_dir.display());
    }
    std::fs::create_dir_all(out_dir)?;
    std::fs::create_dir_all(suspect_dir)?;

    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        println!("No PDFs found in {}.", input_dir.display());
        return Ok(());
    }

    println!("Parsing {} resumes...", pdfs.len());
    let total = pdfs.len();
    let mut failures = 0usize;
    let mut suspects = 0usize;

    for (i, pdf_path) in pdfs.iter().enumerate() {
        let index = i + 1;
        let file_name = pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let record = cvsift_ingest::parse(pdf_path);
        let json_path = collision_free(
            out_dir,
            &format!("{}_resume.json", safe_stem(&record, pdf_path)),
        );
        std::fs::write(&json_path, record.to_json_pretty())?;

        if record.is_fallback() {
            failures += 1;
            let message = format!(
                "[{index}/{total}] FAIL: {file_name} :: {}",
                record.error.as_deref().unwrap_or("unknown error")
            );
            if color {
                eprintln!("{}", message.red());
            } else {
                eprintln!("{message}");
            }
            continue;
        }

        if is_suspect(&record) {
            suspects += 1;
            let dest = collision_free(suspect_dir, &file_name);
            std::fs::rename(pdf_path, &dest)?;
            let message =
                format!("[{index}/{total}] SUSPECT -> moved to {}: {file_name}", suspect_dir.display());
            if color {
                println!("{}", message.yellow());
            } else {
                println!("{message}");
            }
        } else {
            let message = format!("[{index}/{total}] OK: {file_name}");
            if color {
                println!("{}", message.green());
            } else {
                println!("{message}");
            }
        }
    }

    println!(
        "Done: {} parsed, {} suspect, {} failed.",
        total - suspects - failures,
        suspects,
        failures
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvsift_ingest::PersonalInfo;

    fn record(name: &str, skills: &[&str]) -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                name: name.to_string(),
                ..PersonalInfo::default()
            },
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn suspect_rules() {
        assert!(is_suspect(&record("Jane Doe", &[])), "empty skills");
        assert!(
            is_suspect(&record("Jane Alice Mary Doe", &["SQL"])),
            "too many name tokens"
        );
        assert!(
            is_suspect(&record("•Jane Doe", &["SQL"])),
            "non-alphabetic leading char"
        );
        assert!(is_suspect(&record("", &["SQL"])), "empty name");
        assert!(!is_suspect(&record("Jane Doe", &["SQL"])));
    }

    #[test]
    fn safe_stem_from_name() {
        let r = record("Jane A. Doe", &["SQL"]);
        assert_eq!(safe_stem(&r, Path::new("in/orig.pdf")), "Jane_A_Doe");
    }

    #[test]
    fn safe_stem_falls_back_to_file_stem() {
        let r = record("Unknown", &[]);
        assert_eq!(safe_stem(&r, Path::new("in/orig-cv.pdf")), "orig-cv");
    }

    #[test]
    fn collision_free_adds_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let first = collision_free(dir.path(), "a.pdf");
        assert_eq!(first, dir.path().join("a.pdf"));
        std::fs::write(&first, b"x").unwrap();
        let second = collision_free(dir.path(), "a.pdf");
        assert_eq!(second, dir.path().join("a_1.pdf"));
    }
}
