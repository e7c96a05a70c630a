//! Wire shapes for the upload endpoints.

use serde::Serialize;
use serde_json::Value;

use cvsift_ingest::ResumeRecord;

/// Upload metadata wrapped around every single-file response.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub filename: String,
    pub file_size: usize,
    pub processing_status: &'static str,
}

/// The single-file response: the record's own fields plus a `metadata`
/// object.
pub fn with_metadata(record: &ResumeRecord, filename: &str, file_size: usize) -> Value {
    let mut body = serde_json::to_value(record).expect("record serialization is infallible");
    let status = if record.is_fallback() {
        "failed"
    } else {
        "success"
    };
    body["metadata"] = serde_json::to_value(Metadata {
        filename: filename.to_string(),
        file_size,
        processing_status: status,
    })
    .expect("metadata serialization is infallible");
    body
}

/// One entry in the batch response, flattened the way the front end
/// consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn ok(filename: String, record: &ResumeRecord) -> Self {
        let data = serde_json::json!({
            "name": record.personal_info.name,
            "email": record.personal_info.email,
            "phone": record.personal_info.phone,
            "location": record.personal_info.location,
            "linkedin": record.personal_info.linkedin,
            "github": record.personal_info.github,
            "skills": record.skills,
            "total_experience": record.total_experience,
        });
        Self {
            filename,
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(filename: String, error: String) -> Self {
        Self {
            filename,
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_wraps_record_fields() {
        let record = ResumeRecord::default();
        let body = with_metadata(&record, "jane.pdf", 1234);
        assert_eq!(body["metadata"]["filename"], "jane.pdf");
        assert_eq!(body["metadata"]["file_size"], 1234);
        assert_eq!(body["metadata"]["processing_status"], "success");
        assert!(body["personalInfo"].is_object());
    }

    #[test]
    fn fallback_record_reports_failed_status() {
        let record = ResumeRecord::fallback("boom");
        let body = with_metadata(&record, "jane.pdf", 0);
        assert_eq!(body["metadata"]["processing_status"], "failed");
        assert_eq!(body["error"], "boom");
    }

    #[test]
    fn batch_entry_flattens_personal_info() {
        let record = ResumeRecord::default();
        let entry = BatchEntry::ok("jane.pdf".to_string(), &record);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["name"], "Unknown");
        assert!(value["data"]["skills"].is_array());
    }
}
