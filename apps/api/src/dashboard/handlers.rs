//! Axum route handlers for browsing, exporting and charting stored records.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::dashboard::analytics::{
    experience_distribution, skill_frequency, ExperienceBucket, SkillCount,
};
use crate::dashboard::export::{to_csv, to_json, CSV_FILE_NAME, JSON_FILE_NAME};
use crate::dashboard::ResumeFilter;
use crate::errors::AppError;
use crate::models::ResumeRecord;
use crate::state::AppState;

/// Experience entries shown inline before the preview is cut off.
const PREVIEW_ENTRIES: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResumeRow {
    #[serde(flatten)]
    pub record: ResumeRecord,
    pub experience_preview: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    /// Records in the store.
    pub total: usize,
    /// Records passing the filter.
    pub showing: usize,
    pub resumes: Vec<ResumeRow>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total: usize,
    pub showing: usize,
    pub skill_frequency: Vec<SkillCount>,
    pub experience_distribution: Vec<ExperienceBucket>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes?name=&skill=&min_experience=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(filter): Query<ResumeFilter>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let records = state.store.load_all().await?;
    let filtered = filter.apply(&records);

    Ok(Json(ResumeListResponse {
        total: records.len(),
        showing: filtered.len(),
        resumes: filtered
            .into_iter()
            .map(|r| ResumeRow {
                experience_preview: experience_preview(&r.experience),
                record: r.clone(),
            })
            .collect(),
    }))
}

/// GET /api/v1/resumes/export/csv
pub async fn handle_export_csv(
    State(state): State<AppState>,
    Query(filter): Query<ResumeFilter>,
) -> Result<Response, AppError> {
    let records = state.store.load_all().await?;
    let body = to_csv(&filter.apply(&records))?;
    Ok(attachment("text/csv", CSV_FILE_NAME, body))
}

/// GET /api/v1/resumes/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
    Query(filter): Query<ResumeFilter>,
) -> Result<Response, AppError> {
    let records = state.store.load_all().await?;
    let body = to_json(&filter.apply(&records))?;
    Ok(attachment("application/json", JSON_FILE_NAME, body))
}

/// GET /api/v1/resumes/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    Query(filter): Query<ResumeFilter>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let records = state.store.load_all().await?;
    let filtered = filter.apply(&records);

    Ok(Json(AnalyticsResponse {
        total: records.len(),
        showing: filtered.len(),
        skill_frequency: skill_frequency(&filtered),
        experience_distribution: experience_distribution(&filtered),
    }))
}

fn attachment(content_type: &'static str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// First two entries joined with `"; "`, with `" ..."` appended when more exist.
fn experience_preview(experience: &[String]) -> String {
    let shown = experience
        .iter()
        .take(PREVIEW_ENTRIES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    if experience.len() > PREVIEW_ENTRIES {
        format!("{shown} ...")
    } else {
        shown
    }
}
