mod config;
mod docx;
mod html;
mod layout;
mod pdf;
mod views;

pub use config::{ReportConfig, Rgb};
pub use html::escape_html;
pub use layout::{plain_text, Block, Inline, ParagraphStyle, ReportLayout, Span};
pub use views::{
    AnalysisView, CategoryGroupView, CategoryMetricView, GradeBandView, ScoreBoxView,
    StatementView,
};

use super::domain::ClassifiedStatement;
use super::scoring::{GradeScale, InvariantViolation, Summary};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Docx,
    Html,
}

impl ReportFormat {
    pub const fn ordered() -> [Self; 3] {
        [Self::Pdf, Self::Docx, Self::Html]
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Html => "html",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Html => "text/html; charset=utf-8",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = RenderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|format| format.extension() == normalized)
            .ok_or_else(|| RenderError::UnknownFormat(raw.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("refusing to render inconsistent report: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
    #[error("DOCX rendering failed: {0}")]
    Docx(String),
    #[error("HTML rendering failed")]
    Html(#[from] fmt::Error),
    #[error("unknown report format `{0}` (expected pdf, docx or html)")]
    UnknownFormat(String),
}

/// Download name for a report generated at `generated_at`, e.g.
/// `DesInfo_Report_20240131_142501.pdf`.
pub fn report_file_name(generated_at: NaiveDateTime, format: ReportFormat) -> String {
    format!(
        "DesInfo_Report_{}.{}",
        generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Produces every report target from one summary and its records.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    config: ReportConfig,
    grades: GradeScale,
}

impl ReportRenderer {
    pub fn new(config: ReportConfig, grades: GradeScale) -> Self {
        Self { config, grades }
    }

    pub fn standard() -> Self {
        Self::new(ReportConfig::standard(), GradeScale::standard())
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn grades(&self) -> &GradeScale {
        &self.grades
    }

    /// Shared section structure; fails if `summary` does not describe
    /// `statements`.
    pub fn layout(
        &self,
        summary: &Summary,
        statements: &[ClassifiedStatement],
    ) -> Result<ReportLayout, RenderError> {
        summary.verify_against(statements)?;
        Ok(ReportLayout::build(
            summary,
            statements,
            &self.config,
            &self.grades,
        ))
    }

    pub fn view(
        &self,
        summary: &Summary,
        statements: &[ClassifiedStatement],
    ) -> Result<AnalysisView, RenderError> {
        summary.verify_against(statements)?;
        Ok(AnalysisView::build(
            summary,
            statements,
            &self.config,
            &self.grades,
        ))
    }

    pub fn render(
        &self,
        format: ReportFormat,
        summary: &Summary,
        statements: &[ClassifiedStatement],
    ) -> Result<RenderedReport, RenderError> {
        let layout = self.layout(summary, statements)?;
        let bytes = match format {
            ReportFormat::Pdf => pdf::render(&layout, &self.config.title)?,
            ReportFormat::Docx => docx::render(&layout)?,
            ReportFormat::Html => html::render(&layout, &self.config.title)?.into_bytes(),
        };
        debug!(format = %format, bytes = bytes.len(), "report rendered");
        Ok(RenderedReport { format, bytes })
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::standard()
    }
}
