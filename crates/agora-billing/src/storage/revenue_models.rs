use crate::domain::revenue::RevenueShareModel;
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Logical key of a revenue-sharing model: unique together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub owner_provider_id: String,
    pub product_class: String,
}

impl ModelKey {
    pub fn new(owner_provider_id: impl Into<String>, product_class: impl Into<String>) -> Self {
        Self {
            owner_provider_id: owner_provider_id.into(),
            product_class: product_class.into(),
        }
    }
}

/// Equality filters and pagination for listing models.
#[derive(Debug, Clone, Default)]
pub struct ListModelsFilter {
    pub owner_provider_id: Option<String>,
    pub product_class: Option<String>,
    pub algorithm_type: Option<String>,
    pub offset: Option<usize>,
    pub size: Option<usize>,
}

/// Persistence seam for revenue-sharing models; the backing technology is an
/// external collaborator. Implementations must serialize concurrent writes to
/// the same key so that two racing updates cannot both pass validation
/// against stale percentage sums.
#[async_trait]
pub trait RevenueShareModelRepository: Send + Sync {
    /// Inserts a new model; the key must not exist yet.
    async fn create(&self, model: RevenueShareModel) -> Result<()>;

    async fn get(&self, key: &ModelKey) -> Result<Option<RevenueShareModel>>;

    /// Replaces an existing model; the key must already exist.
    async fn save(&self, model: RevenueShareModel) -> Result<()>;

    async fn list(&self, filter: &ListModelsFilter) -> Result<Vec<RevenueShareModel>>;
}

/// In-memory store, the in-scope implementation for tests and single-node
/// deployments.
#[derive(Default)]
pub struct InMemoryRevenueShareRepository {
    models: RwLock<HashMap<ModelKey, RevenueShareModel>>,
}

impl InMemoryRevenueShareRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key_of(model: &RevenueShareModel) -> ModelKey {
    ModelKey::new(model.owner_provider_id.clone(), model.product_class.clone())
}

#[async_trait]
impl RevenueShareModelRepository for InMemoryRevenueShareRepository {
    async fn create(&self, model: RevenueShareModel) -> Result<()> {
        let key = key_of(&model);
        let mut models = self.models.write().await;
        if models.contains_key(&key) {
            return Err(BillingError::ModelExists {
                owner_provider_id: key.owner_provider_id,
                product_class: key.product_class,
            });
        }
        models.insert(key, model);
        Ok(())
    }

    async fn get(&self, key: &ModelKey) -> Result<Option<RevenueShareModel>> {
        let models = self.models.read().await;
        Ok(models.get(key).cloned())
    }

    async fn save(&self, model: RevenueShareModel) -> Result<()> {
        let key = key_of(&model);
        let mut models = self.models.write().await;
        if !models.contains_key(&key) {
            return Err(BillingError::ModelNotFound {
                owner_provider_id: key.owner_provider_id,
                product_class: key.product_class,
            });
        }
        models.insert(key, model);
        Ok(())
    }

    async fn list(&self, filter: &ListModelsFilter) -> Result<Vec<RevenueShareModel>> {
        let models = self.models.read().await;

        let mut matching: Vec<RevenueShareModel> = models
            .values()
            .filter(|model| {
                filter
                    .owner_provider_id
                    .as_ref()
                    .map_or(true, |id| *id == model.owner_provider_id)
                    && filter
                        .product_class
                        .as_ref()
                        .map_or(true, |class| *class == model.product_class)
                    && filter
                        .algorithm_type
                        .as_ref()
                        .map_or(true, |algorithm| *algorithm == model.algorithm_type)
            })
            .cloned()
            .collect();

        // Deterministic listing order for pagination.
        matching.sort_by(|a, b| {
            (&a.owner_provider_id, &a.product_class).cmp(&(&b.owner_provider_id, &b.product_class))
        });

        Ok(matching)
    }
}
