//! Multipart upload handler: 1-5 files in, AI-generated study notes out.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use studium_core::defaults;
use studium_core::Note;

use crate::auth::UserId;
use crate::error::ApiError;
use crate::services::{process_batch, GroupingPlan, UploadedFile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub notes: Vec<Note>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Best-effort MIME type for an uploaded part: the part's declared type,
/// then magic-byte detection, then a generic fallback.
fn resolve_mime_type(declared: Option<&str>, data: &[u8]) -> String {
    if let Some(mime) = declared.filter(|m| !m.is_empty() && *m != "application/octet-stream") {
        return mime.to_string();
    }
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    defaults::FALLBACK_MIME_TYPE.to_string()
}

/// Pull files and grouping fields out of the multipart body.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(Vec<UploadedFile>, bool, Option<String>), ApiError> {
    let mut files = Vec::new();
    let mut group_files = false;
    let mut grouping_json = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("files") => {
                let file_name = field
                    .file_name()
                    .map(|n| n.to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("file-{}", files.len() + 1));
                let declared = field.content_type().map(|m| m.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {}", file_name, e)))?
                    .to_vec();

                let mime_type = resolve_mime_type(declared.as_deref(), &data);
                debug!(
                    subsystem = "api",
                    op = "upload",
                    file_name = %file_name,
                    mime_type = %mime_type,
                    size = data.len(),
                    "Received upload part"
                );
                files.push(UploadedFile {
                    file_name,
                    mime_type,
                    data,
                });
            }
            Some("group_files") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid group_files field: {}", e)))?;
                group_files = matches!(value.trim(), "true" | "1" | "on");
            }
            Some("grouping") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid grouping field: {}", e)))?;
                grouping_json = Some(value);
            }
            _ => {}
        }
    }

    Ok((files, group_files, grouping_json))
}

/// POST /api/upload
pub async fn upload_files(
    State(state): State<AppState>,
    user: UserId,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (files, group_files, grouping_json) = read_multipart(multipart).await?;

    if files.is_empty() {
        return Err(ApiError::BadRequest("No files provided".to_string()));
    }
    if files.len() > defaults::MAX_UPLOAD_FILES {
        return Err(ApiError::PayloadTooLarge(format!(
            "You can upload a maximum of {} files",
            defaults::MAX_UPLOAD_FILES
        )));
    }

    let plan = GroupingPlan::from_request(group_files, grouping_json.as_deref())?;

    let outcome = process_batch(
        state.gemini.as_ref(),
        &state.gemini.title_backend(),
        &state.db.notes,
        user.as_str(),
        &files,
        &plan,
    )
    .await?;

    // Zero notes out of a non-empty batch is a hard failure; the collected
    // item errors go to the caller so they can see what went wrong.
    if outcome.notes.is_empty() {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "message": "Failed to process files",
                "errors": outcome.errors,
            })),
        )
            .into_response());
    }

    Ok(Json(UploadResponse {
        success: true,
        message: "Files processed and stored successfully".to_string(),
        notes: outcome.notes,
        errors: outcome.errors,
        warnings: outcome.warnings,
    })
    .into_response())
}
