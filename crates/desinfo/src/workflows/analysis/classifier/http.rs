use super::super::domain::{CategoryTable, ClassifiedStatement, Statement};
use super::models::decode_model_listing;
use super::wire::decode_classifications;
use super::{ClassificationServiceError, Classifier, ModelCatalog, ModelDescriptor, ModelId};
use crate::config::ClassifierConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const MODELS_PATH: &str = "/desInfo/models";
const ANALYZE_PATH: &str = "/desInfo/generateReport";

/// HTTP client for the DESINFO classification service.
#[derive(Debug, Clone)]
pub struct DesinfoClient {
    http: Client,
    base_url: String,
    analyze_timeout: Duration,
    models_timeout: Duration,
    weights: CategoryTable<u32>,
}

impl DesinfoClient {
    /// `weights` backfills points for records the service sends without them.
    pub fn new(
        config: &ClassifierConfig,
        weights: CategoryTable<u32>,
    ) -> Result<Self, ClassificationServiceError> {
        let http = Client::builder()
            .build()
            .map_err(|err| ClassificationServiceError::Configuration(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            analyze_timeout: config.analyze_timeout,
            models_timeout: config.models_timeout,
            weights,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json(
        &self,
        response: Response,
        timeout: Duration,
    ) -> Result<Value, ClassificationServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassificationServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| transport_error(err, timeout))?;
        serde_json::from_str(&body)
            .map_err(|err| ClassificationServiceError::Malformed(err.to_string()))
    }
}

#[async_trait]
impl Classifier for DesinfoClient {
    async fn classify(
        &self,
        model: &ModelId,
        statements: &[Statement],
    ) -> Result<Vec<ClassifiedStatement>, ClassificationServiceError> {
        if statements.is_empty() {
            return Ok(Vec::new());
        }

        let joined = statements
            .iter()
            .map(Statement::text)
            .collect::<Vec<_>>()
            .join("|");

        info!(model = %model, statements = statements.len(), "requesting classification");

        let response = self
            .http
            .get(format!("{}{}", self.base_url, ANALYZE_PATH))
            .query(&[("modelID", model.as_str()), ("text", joined.as_str())])
            .timeout(self.analyze_timeout)
            .send()
            .await
            .map_err(|err| transport_error(err, self.analyze_timeout))?;

        let payload = self.read_json(response, self.analyze_timeout).await?;
        let records = decode_classifications(payload, &self.weights)?;
        debug!(records = records.len(), "classification decoded");
        Ok(records)
    }
}

#[async_trait]
impl ModelCatalog for DesinfoClient {
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClassificationServiceError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, MODELS_PATH))
            .timeout(self.models_timeout)
            .send()
            .await
            .map_err(|err| transport_error(err, self.models_timeout))?;

        let payload = self.read_json(response, self.models_timeout).await?;
        let models = decode_model_listing(payload).ok_or_else(|| {
            ClassificationServiceError::Malformed("model listing has no models array".to_string())
        })?;
        debug!(models = models.len(), "model listing fetched");
        Ok(models)
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ClassificationServiceError {
    if err.is_timeout() {
        ClassificationServiceError::Timeout(timeout)
    } else {
        ClassificationServiceError::Transport(err.to_string())
    }
}
