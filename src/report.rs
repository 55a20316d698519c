// Per-page annotation reports
use crate::analyzer::AnnotationResult;
use crate::model::{Annotation, Skip, WriteError};
use crate::writer::save_page;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub source: String,
    pub annotated_at: DateTime<Utc>,
    pub annotations: Vec<Annotation>,
    pub skipped: BTreeMap<Skip, usize>,
}

impl PageReport {
    pub fn new(source: &str, result: AnnotationResult) -> Self {
        Self {
            source: source.to_string(),
            annotated_at: Utc::now(),
            annotations: result.annotations,
            skipped: result.skipped.into_iter().collect(),
        }
    }
}

pub fn render_reports(reports: &[PageReport]) -> Result<String, WriteError> {
    Ok(serde_json::to_string_pretty(reports)?)
}

pub async fn save_reports(path: &Path, reports: &[PageReport]) -> Result<(), WriteError> {
    let json = render_reports(reports)?;
    save_page(path, &json).await
}
