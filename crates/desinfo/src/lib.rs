//! Scoring and report rendering for political statements classified by a
//! remote DESINFO analysis service.
//!
//! Raw text is split into statements, sent to the classifier, and the
//! returned records are aggregated into a graded [`Summary`] that renders
//! identically as an HTML view, a PDF, and a DOCX document.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use workflows::analysis::{
    parse_statements, Analysis, AnalysisError, AnalysisService, Category, CategoryLabel,
    ClassifiedStatement, ReportFormat, ReportRenderer, ScoreAggregator, Statement, Summary,
};
