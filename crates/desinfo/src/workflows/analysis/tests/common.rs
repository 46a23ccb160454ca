use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::analysis::classifier::{
    ClassificationServiceError, Classifier, ModelCatalog, ModelDescriptor, ModelId,
};
use crate::workflows::analysis::domain::{CategoryLabel, ClassifiedStatement, Statement};
use crate::workflows::analysis::report::ReportConfig;
use crate::workflows::analysis::scoring::ScoreAggregator;
use crate::workflows::analysis::service::AnalysisService;

pub(super) fn model(id: &str, name: &str) -> ModelDescriptor {
    ModelDescriptor {
        id: ModelId::new(id),
        name: name.to_string(),
        provider: "OpenAI".to_string(),
        valid: true,
    }
}

/// Catalog returning a fixed listing.
pub(super) struct StaticCatalog(pub(super) Vec<ModelDescriptor>);

#[async_trait]
impl ModelCatalog for StaticCatalog {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClassificationServiceError> {
        Ok(self.0.clone())
    }
}

pub(super) struct UnreachableCatalog;

#[async_trait]
impl ModelCatalog for UnreachableCatalog {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClassificationServiceError> {
        Err(ClassificationServiceError::Transport(
            "connection refused".to_string(),
        ))
    }
}

/// Classifier that labels statements with a scripted category sequence and
/// remembers every call.
#[derive(Default)]
pub(super) struct ScriptedClassifier {
    categories: Vec<String>,
    calls: Mutex<Vec<(ModelId, Vec<String>)>>,
}

impl ScriptedClassifier {
    pub(super) fn new(categories: &[&str]) -> Self {
        Self {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<(ModelId, Vec<String>)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(
        &self,
        model: &ModelId,
        statements: &[Statement],
    ) -> Result<Vec<ClassifiedStatement>, ClassificationServiceError> {
        self.calls.lock().expect("calls lock").push((
            model.clone(),
            statements.iter().map(|s| s.text().to_string()).collect(),
        ));

        Ok(statements
            .iter()
            .zip(self.categories.iter().cycle())
            .map(|(statement, category)| {
                ClassifiedStatement::new(
                    statement.text(),
                    CategoryLabel::parse(category),
                    format!("Begründung zu {}", statement.text()),
                    0,
                )
            })
            .collect())
    }
}

pub(super) struct FailingClassifier(pub(super) fn() -> ClassificationServiceError);

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(
        &self,
        _model: &ModelId,
        _statements: &[Statement],
    ) -> Result<Vec<ClassifiedStatement>, ClassificationServiceError> {
        Err((self.0)())
    }
}

pub(super) fn build_service<C, M>(classifier: C, catalog: M) -> Arc<AnalysisService<C, M>>
where
    C: Classifier + 'static,
    M: ModelCatalog + 'static,
{
    Arc::new(AnalysisService::new(
        Arc::new(classifier),
        Arc::new(catalog),
        ScoreAggregator::default(),
        ReportConfig::standard(),
    ))
}

pub(super) fn scripted_service(
    categories: &[&str],
) -> Arc<AnalysisService<ScriptedClassifier, StaticCatalog>> {
    build_service(
        ScriptedClassifier::new(categories),
        StaticCatalog(vec![model("1", "alpha"), model("2", "beta")]),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
