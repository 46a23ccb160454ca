//! Statement analysis: ingestion, classification, scoring, and reporting.

pub mod classifier;
pub mod domain;
pub mod import;
pub mod ingestion;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    decode_classifications, CachedModelCatalog, ClassificationServiceError, Classifier,
    DesinfoClient, ModelCatalog, ModelDescriptor, ModelId, RecordDecodeError,
};
pub use domain::{
    Category, CategoryLabel, CategoryTable, ClassifiedStatement, MarkerGlyph, Statement,
};
pub use import::{export_csv, import_csv, import_json, ImportError};
pub use ingestion::{parse_statements, validate_input, InputError, DEFAULT_MIN_INPUT_CHARS};
pub use report::{
    report_file_name, AnalysisView, RenderError, RenderedReport, ReportConfig, ReportFormat,
    ReportLayout, ReportRenderer, Rgb,
};
pub use router::{analysis_router, AnalyzeRequest, RenderRequest};
pub use scoring::{
    Grade, GradeBand, GradeScale, InvariantViolation, ScoreAggregator, ScoringConfig,
    ScoringConfigError, Summary,
};
pub use service::{Analysis, AnalysisError, AnalysisService, ModelUnavailableError};
