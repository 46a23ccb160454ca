//! Boundary to the remote classification service.
//!
//! The analysis service only sees the [`Classifier`] and [`ModelCatalog`]
//! traits; [`DesinfoClient`] is the HTTP implementation and
//! [`CachedModelCatalog`] wraps any catalog with a TTL cache.

mod cache;
mod http;
mod models;
mod wire;

pub use cache::CachedModelCatalog;
pub use http::DesinfoClient;
pub use models::{ModelDescriptor, ModelId};
pub use wire::{decode_classifications, RecordDecodeError};

use super::domain::{ClassifiedStatement, Statement};
use async_trait::async_trait;
use std::time::Duration;

/// Classifies statements with a given model. Returned records are expected
/// in input order, one per statement.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        model: &ModelId,
        statements: &[Statement],
    ) -> Result<Vec<ClassifiedStatement>, ClassificationServiceError>;
}

/// Lists the models the classification service currently offers.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Only models flagged valid are returned, in service order.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClassificationServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationServiceError {
    #[error("classification service unreachable: {0}")]
    Transport(String),
    #[error("classification service did not answer within {0:?}")]
    Timeout(Duration),
    #[error("classification service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("classification service response is not valid JSON: {0}")]
    Malformed(String),
    #[error(transparent)]
    Decode(#[from] RecordDecodeError),
    #[error("classification client misconfigured: {0}")]
    Configuration(String),
}
