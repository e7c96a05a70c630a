//! Upload handlers.
//!
//! Uploaded bytes spill to a named temp file whose lifetime is scoped to the
//! parse call: the file is removed on every exit path, success or failure.

use std::io::Write;
use std::path::Path;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use cvsift_ingest::ResumeRecord;

use crate::models::{with_metadata, BatchEntry};

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "resume parser API is running", "status": "active" }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

struct Upload {
    filename: String,
    data: Vec<u8>,
}

/// Read every file field from the multipart form.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<Upload>, String> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("failed to read form field: {err}"))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            // Non-file form fields are ignored
            let _ = field.bytes().await;
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|err| format!("failed to read file data: {err}"))?
            .to_vec();
        uploads.push(Upload { filename, data });
    }
    Ok(uploads)
}

/// Parse one upload through a temp file scoped to this call.
async fn parse_upload(upload: Upload) -> ResumeRecord {
    let suffix = Path::new(&upload.filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || {
        let mut tmp = match tempfile::Builder::new().suffix(&suffix).tempfile() {
            Ok(tmp) => tmp,
            Err(err) => return ResumeRecord::fallback(format!("temp file error: {err}")),
        };
        if let Err(err) = tmp.write_all(&upload.data) {
            return ResumeRecord::fallback(format!("temp file error: {err}"));
        }
        // The temp file is deleted when `tmp` drops, on every path.
        cvsift_ingest::parse(tmp.path())
    })
    .await;

    result.unwrap_or_else(|err| ResumeRecord::fallback(format!("worker failed: {err}")))
}

/// POST /parse-resume — single file, record plus metadata wrapper.
pub async fn parse_resume(multipart: Multipart) -> impl IntoResponse {
    let uploads = match read_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(err) => return boundary_error(StatusCode::INTERNAL_SERVER_ERROR, "unknown", &err),
    };
    let Some(upload) = uploads.into_iter().next() else {
        return boundary_error(StatusCode::BAD_REQUEST, "unknown", "no file uploaded");
    };

    if !cvsift_ingest::is_accepted(Path::new(&upload.filename)) {
        return boundary_error(
            StatusCode::BAD_REQUEST,
            &upload.filename,
            "unsupported file type: upload PDF, DOCX, TXT, or RTF",
        );
    }

    let filename = upload.filename.clone();
    let size = upload.data.len();
    let record = parse_upload(upload).await;
    (StatusCode::OK, Json(with_metadata(&record, &filename, size))).into_response()
}

/// POST /parse-multiple — batch upload, one entry per file.
pub async fn parse_multiple(multipart: Multipart) -> impl IntoResponse {
    let uploads = match read_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(err) => return boundary_error(StatusCode::INTERNAL_SERVER_ERROR, "unknown", &err),
    };

    let mut results = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let filename = upload.filename.clone();
        if !cvsift_ingest::is_accepted(Path::new(&filename)) {
            results.push(BatchEntry::failed(
                filename,
                "unsupported file type".to_string(),
            ));
            continue;
        }
        let record = parse_upload(upload).await;
        if let Some(error) = &record.error {
            results.push(BatchEntry::failed(filename, error.clone()));
        } else {
            results.push(BatchEntry::ok(filename, &record));
        }
    }

    (StatusCode::OK, Json(json!({ "results": results }))).into_response()
}

/// Boundary-level failures keep the fallback record shape so clients always
/// see the same contract.
fn boundary_error(
    status: StatusCode,
    filename: &str,
    message: &str,
) -> axum::response::Response {
    tracing::warn!(filename, message, "boundary error");
    let record = ResumeRecord::fallback(message);
    (
        status,
        Json(with_metadata(&record, filename, 0)),
    )
        .into_response()
}
