use super::{ClassificationServiceError, ModelCatalog, ModelDescriptor};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Serves model listings from memory for a fixed TTL.
///
/// Only non-empty successful listings are stored, so an outage or an empty
/// answer is retried on the next call.
pub struct CachedModelCatalog<M> {
    inner: M,
    cache: Cache<(), Arc<Vec<ModelDescriptor>>>,
}

impl<M> CachedModelCatalog<M>
where
    M: ModelCatalog,
{
    pub fn new(inner: M, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { inner, cache }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// Drops the cached listing so the next call refetches it.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}

#[async_trait]
impl<M> ModelCatalog for CachedModelCatalog<M>
where
    M: ModelCatalog,
{
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClassificationServiceError> {
        if let Some(models) = self.cache.get(&()).await {
            debug!("model listing served from cache");
            return Ok(models.as_ref().clone());
        }

        let models = self.inner.list_models().await?;
        if !models.is_empty() {
            self.cache.insert((), Arc::new(models.clone())).await;
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::analysis::classifier::ModelId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCatalog {
        calls: AtomicUsize,
        models: Vec<ModelDescriptor>,
    }

    #[async_trait]
    impl ModelCatalog for CountingCatalog {
        async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClassificationServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.models.clone())
        }
    }

    fn model() -> ModelDescriptor {
        ModelDescriptor {
            id: ModelId::new("1"),
            name: "alpha".to_string(),
            provider: "OpenAI".to_string(),
            valid: true,
        }
    }

    #[tokio::test]
    async fn repeated_listings_hit_the_cache() {
        let catalog = CachedModelCatalog::new(
            CountingCatalog {
                calls: AtomicUsize::new(0),
                models: vec![model()],
            },
            Duration::from_secs(300),
        );

        assert_eq!(catalog.list_models().await.expect("first").len(), 1);
        assert_eq!(catalog.list_models().await.expect("second").len(), 1);
        assert_eq!(catalog.inner().calls.load(Ordering::SeqCst), 1);

        catalog.invalidate().await;
        catalog.list_models().await.expect("after invalidate");
        assert_eq!(catalog.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_listings_are_not_cached() {
        let catalog = CachedModelCatalog::new(
            CountingCatalog {
                calls: AtomicUsize::new(0),
                models: Vec::new(),
            },
            Duration::from_secs(300),
        );

        assert!(catalog.list_models().await.expect("first").is_empty());
        assert!(catalog.list_models().await.expect("second").is_empty());
        assert_eq!(catalog.inner().calls.load(Ordering::SeqCst), 2);
    }
}
