//! CSV and JSON exports of the filtered view.

use thiserror::Error;

use crate::models::ResumeRecord;

pub const CSV_FILE_NAME: &str = "resumes.csv";
pub const JSON_FILE_NAME: &str = "resumes.json";

const CSV_HEADER: [&str; 5] = ["name", "email", "phone", "skills", "experience"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row per record; sequences are flattened to display strings
/// (skills joined with `", "`, experience with `" | "`).
pub fn to_csv(records: &[&ResumeRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.email.as_str(),
            record.phone.as_str(),
            record.skills_display().as_str(),
            record.experience_display().as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Structured array of the records, pretty-printed.
pub fn to_json(records: &[&ResumeRecord]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(records)?)
}
