//! Axum route handlers for upload, extraction and saving.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_text_from_pdf;
use crate::models::ResumeRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: Option<String>,
    /// Characters of text recovered from the PDF.
    pub text_chars: usize,
    /// Not yet persisted; POST it to `/api/v1/resumes` to save.
    pub record: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub total: usize,
}

struct Upload {
    file_name: Option<String>,
    data: Bytes,
    api_key: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/extract
///
/// Multipart fields: `file` (the PDF, required) and `api_key` (optional,
/// overrides the configured key for this request). Returns the extracted
/// record without saving it.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(multipart).await?;

    let data = upload.data.clone();
    let text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF load: {e}")))??;

    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the PDF".to_string(),
        ));
    }

    let record = state
        .extractor
        .extract(&text, upload.api_key.as_deref())
        .await?;

    info!(
        file = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        chars = text.chars().count(),
        "Extracted resume fields"
    );

    Ok(Json(ExtractResponse {
        file_name: upload.file_name,
        text_chars: text.chars().count(),
        record,
    }))
}

/// POST /api/v1/resumes
///
/// Appends the record to the store. Duplicates are accepted.
pub async fn handle_save(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<(StatusCode, Json<SaveResponse>), AppError> {
    let total = state.store.append(record).await?;
    Ok((StatusCode::CREATED, Json(SaveResponse { saved: true, total })))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut api_key = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                if let Some(name) = &file_name {
                    if !has_pdf_extension(name) {
                        return Err(AppError::Validation(
                            "Invalid file type. Only PDF files are accepted".to_string(),
                        ));
                    }
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                file = Some((file_name, data));
            }
            "api_key" => {
                api_key = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read api_key: {e}")))?,
                );
            }
            other => {
                // Drain unknown fields so the stream can advance.
                let name = other.to_string();
                field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read field '{name}': {e}"))
                })?;
            }
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    Ok(Upload {
        file_name,
        data,
        api_key,
    })
}

fn has_pdf_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
