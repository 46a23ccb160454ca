use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};

use super::classifier::{
    ClassificationServiceError, Classifier, ModelCatalog, ModelDescriptor, ModelId,
};
use super::domain::ClassifiedStatement;
use super::ingestion::{parse_statements, validate_input, InputError, DEFAULT_MIN_INPUT_CHARS};
use super::report::{
    report_file_name, AnalysisView, RenderError, RenderedReport, ReportConfig, ReportFormat,
    ReportRenderer,
};
use super::scoring::{ScoreAggregator, Summary};

/// One completed analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub model: ModelDescriptor,
    pub submitted: usize,
    pub statements: Vec<ClassifiedStatement>,
    pub summary: Summary,
    pub generated_at: NaiveDateTime,
}

impl Analysis {
    pub fn file_name(&self, format: ReportFormat) -> String {
        report_file_name(self.generated_at, format)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelUnavailableError {
    #[error("the classification service offers no valid models")]
    NoValidModels,
    #[error("model `{0}` is not among the valid models")]
    UnknownModel(ModelId),
    #[error("unable to list models: {0}")]
    Listing(#[source] ClassificationServiceError),
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailableError),
    #[error(transparent)]
    Classification(#[from] ClassificationServiceError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Service composing the model catalog, classifier, aggregator, and renderer.
pub struct AnalysisService<C, M> {
    classifier: Arc<C>,
    catalog: Arc<M>,
    aggregator: Arc<ScoreAggregator>,
    renderer: Arc<ReportRenderer>,
    min_input_chars: usize,
}

impl<C, M> AnalysisService<C, M>
where
    C: Classifier + 'static,
    M: ModelCatalog + 'static,
{
    /// The renderer's grade legend is taken from the aggregator's scale, so
    /// the legend always matches the assigned grade.
    pub fn new(
        classifier: Arc<C>,
        catalog: Arc<M>,
        aggregator: ScoreAggregator,
        report: ReportConfig,
    ) -> Self {
        let renderer = ReportRenderer::new(report, aggregator.config().grades().clone());
        Self {
            classifier,
            catalog,
            aggregator: Arc::new(aggregator),
            renderer: Arc::new(renderer),
            min_input_chars: DEFAULT_MIN_INPUT_CHARS,
        }
    }

    pub fn with_min_input_chars(mut self, min_input_chars: usize) -> Self {
        self.min_input_chars = min_input_chars;
        self
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn aggregator(&self) -> &ScoreAggregator {
        &self.aggregator
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Valid models in service order; empty or failed listings are errors.
    pub async fn available_models(&self) -> Result<Vec<ModelDescriptor>, ModelUnavailableError> {
        let models = self
            .catalog
            .list_models()
            .await
            .map_err(ModelUnavailableError::Listing)?;
        if models.is_empty() {
            return Err(ModelUnavailableError::NoValidModels);
        }
        Ok(models)
    }

    /// Picks the requested model, or the first valid one when none is given.
    pub async fn resolve_model(
        &self,
        requested: Option<&ModelId>,
    ) -> Result<ModelDescriptor, ModelUnavailableError> {
        let models = self.available_models().await?;
        match requested {
            Some(id) => models
                .into_iter()
                .find(|model| &model.id == id)
                .ok_or_else(|| ModelUnavailableError::UnknownModel(id.clone())),
            None => models
                .into_iter()
                .next()
                .ok_or(ModelUnavailableError::NoValidModels),
        }
    }

    /// Validates and splits `text`, classifies the statements, and scores them.
    pub async fn analyze(
        &self,
        text: &str,
        model: Option<&ModelId>,
    ) -> Result<Analysis, AnalysisError> {
        let text = validate_input(text, self.min_input_chars)?;
        let statements = parse_statements(text);
        if statements.is_empty() {
            return Err(InputError::NoStatements.into());
        }

        let model = self.resolve_model(model).await?;

        let started = Instant::now();
        let records = self.classifier.classify(&model.id, &statements).await?;
        info!(
            model = %model.id,
            statements = statements.len(),
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "classification finished"
        );

        if records.len() != statements.len() {
            warn!(
                submitted = statements.len(),
                returned = records.len(),
                "classifier returned a different number of records than submitted"
            );
        }

        let summary = self.aggregator.summarize(&records);
        Ok(Analysis {
            model,
            submitted: statements.len(),
            statements: records,
            summary,
            generated_at: Local::now().naive_local(),
        })
    }

    pub fn summarize(&self, records: &[ClassifiedStatement]) -> Summary {
        self.aggregator.summarize(records)
    }

    pub fn view(&self, analysis: &Analysis) -> Result<AnalysisView, AnalysisError> {
        Ok(self.renderer.view(&analysis.summary, &analysis.statements)?)
    }

    pub fn render(
        &self,
        analysis: &Analysis,
        format: ReportFormat,
    ) -> Result<RenderedReport, AnalysisError> {
        Ok(self
            .renderer
            .render(format, &analysis.summary, &analysis.statements)?)
    }

    /// Scores and renders records produced by an earlier run.
    pub fn render_records(
        &self,
        records: &[ClassifiedStatement],
        format: ReportFormat,
    ) -> Result<RenderedReport, AnalysisError> {
        let summary = self.aggregator.summarize(records);
        Ok(self.renderer.render(format, &summary, records)?)
    }
}
