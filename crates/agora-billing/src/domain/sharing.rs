use crate::config::BillingConfig;
use crate::domain::algorithms::{AlgorithmInfo, AlgorithmRegistry, RevenueShareReport};
use crate::domain::money::Money;
use crate::domain::revenue::{RevenueShareModel, RevenueShareModelUpdate};
use crate::error::{BillingError, Result};
use crate::storage::{ListModelsFilter, ModelKey, RevenueShareModelRepository};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Administrative operations on revenue-sharing models and the share
/// calculation that applies them.
///
/// Partial updates are merged into a full snapshot and re-validated before
/// saving; the read-modify-write runs under a service-level lock so racing
/// updates to the same store cannot both validate against stale sums.
pub struct RevenueShareService {
    repository: Arc<dyn RevenueShareModelRepository>,
    algorithms: AlgorithmRegistry,
    config: BillingConfig,
    update_lock: Mutex<()>,
}

impl RevenueShareService {
    pub fn new(repository: Arc<dyn RevenueShareModelRepository>, config: BillingConfig) -> Self {
        Self::with_algorithms(repository, AlgorithmRegistry::default(), config)
    }

    pub fn with_algorithms(
        repository: Arc<dyn RevenueShareModelRepository>,
        algorithms: AlgorithmRegistry,
        config: BillingConfig,
    ) -> Self {
        Self {
            repository,
            algorithms,
            config,
            update_lock: Mutex::new(()),
        }
    }

    /// Validates and stores a new model; the `(ownerProviderId, productClass)`
    /// key must be free.
    pub async fn create_model(&self, model: RevenueShareModel) -> Result<RevenueShareModel> {
        model.validate()?;
        self.repository.create(model.clone()).await?;

        info!(
            owner_provider_id = %model.owner_provider_id,
            product_class = %model.product_class,
            "created revenue sharing model"
        );
        Ok(model)
    }

    /// Merges a partial update into the stored model, re-validates the full
    /// document and saves it.
    pub async fn update_model(&self, update: RevenueShareModelUpdate) -> Result<RevenueShareModel> {
        let _guard = self.update_lock.lock().await;

        let key = ModelKey::new(update.owner_provider_id.clone(), update.product_class.clone());
        let mut model = self.require_model(&key).await?;

        model.apply_update(update);
        model.validate()?;
        self.repository.save(model.clone()).await?;

        info!(
            owner_provider_id = %model.owner_provider_id,
            product_class = %model.product_class,
            "updated revenue sharing model"
        );
        Ok(model)
    }

    pub async fn get_model(
        &self,
        owner_provider_id: &str,
        product_class: &str,
    ) -> Result<RevenueShareModel> {
        self.require_model(&ModelKey::new(owner_provider_id, product_class))
            .await
    }

    /// Lists models matching the filter, paginated with the configured
    /// defaults when the filter leaves offset/size unset.
    pub async fn list_models(&self, filter: ListModelsFilter) -> Result<Vec<RevenueShareModel>> {
        let offset = filter.offset.unwrap_or(self.config.listing.default_offset);
        let size = filter
            .size
            .unwrap_or(self.config.listing.default_page_size)
            .min(self.config.listing.max_page_size);

        let matching = self.repository.list(&filter).await?;
        debug!(matching = matching.len(), offset, size, "listing revenue sharing models");

        Ok(matching.into_iter().skip(offset).take(size).collect())
    }

    /// Applies the model registered for the key to `total_revenue`, using the
    /// strategy selected by its `algorithmType`.
    pub async fn calculate_shares(
        &self,
        owner_provider_id: &str,
        product_class: &str,
        total_revenue: Money,
    ) -> Result<RevenueShareReport> {
        let model = self
            .require_model(&ModelKey::new(owner_provider_id, product_class))
            .await?;
        let algorithm = self.algorithms.get(&model.algorithm_type)?;

        debug!(
            owner_provider_id,
            product_class,
            algorithm = %model.algorithm_type,
            total_revenue = %total_revenue,
            "calculating revenue shares"
        );
        algorithm.calculate_revenue_share(&model, total_revenue)
    }

    /// Metadata of every registered share-calculation strategy.
    pub fn list_algorithms(&self) -> Vec<AlgorithmInfo> {
        self.algorithms.list()
    }

    async fn require_model(&self, key: &ModelKey) -> Result<RevenueShareModel> {
        self.repository
            .get(key)
            .await?
            .ok_or_else(|| BillingError::ModelNotFound {
                owner_provider_id: key.owner_provider_id.clone(),
                product_class: key.product_class.clone(),
            })
    }
}
