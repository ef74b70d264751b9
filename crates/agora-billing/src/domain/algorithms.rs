use crate::domain::money::Money;
use crate::domain::revenue::{RevenueShareModel, Stakeholder};
use crate::error::{BillingError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Descriptive metadata listed by the administrative collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// A revenue-distribution strategy, selected by the model's `algorithmType`.
pub trait RevenueShareAlgorithm: Send + Sync {
    fn info(&self) -> AlgorithmInfo;

    fn calculate_revenue_share(
        &self,
        model: &RevenueShareModel,
        total_revenue: Money,
    ) -> Result<RevenueShareReport>;
}

/// Per-party shares derived from a validated model; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueShareReport {
    pub owner_provider_id: String,
    pub product_class: String,
    pub algorithm_type: String,
    pub owner_value: Decimal,
    pub owner_share: Money,
    pub aggregator_value: Decimal,
    pub aggregator_share: Money,
    pub stakeholders: Vec<StakeholderShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderShare {
    pub stakeholder_id: String,
    pub stakeholder_value: Decimal,
    pub stakeholder_share: Money,
}

/// Open map from `algorithmType` tag to strategy. Adding an algorithm means
/// registering an implementation here; calculator call sites stay untouched.
pub struct AlgorithmRegistry {
    algorithms: BTreeMap<String, Arc<dyn RevenueShareAlgorithm>>,
}

impl AlgorithmRegistry {
    pub fn empty() -> Self {
        Self {
            algorithms: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, algorithm: Arc<dyn RevenueShareAlgorithm>) {
        self.algorithms
            .insert(algorithm.info().id.to_string(), algorithm);
    }

    pub fn get(&self, algorithm_type: &str) -> Result<Arc<dyn RevenueShareAlgorithm>> {
        self.algorithms
            .get(algorithm_type)
            .cloned()
            .ok_or_else(|| BillingError::UnknownAlgorithm {
                algorithm: algorithm_type.to_string(),
            })
    }

    pub fn list(&self) -> Vec<AlgorithmInfo> {
        self.algorithms
            .values()
            .map(|algorithm| algorithm.info())
            .collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(FixedPercentage));
        registry
    }
}

/// Distributes revenue by the fixed percentages stored on the model.
///
/// Shares are quantized to two decimals independently; no rounding remainder
/// is reassigned.
pub struct FixedPercentage;

impl RevenueShareAlgorithm for FixedPercentage {
    fn info(&self) -> AlgorithmInfo {
        AlgorithmInfo {
            id: "FIXED_PERCENTAGE",
            name: "Fixed Percentage Algorithm",
            description: "Distributes the revenue based on fixed percentages for each party",
        }
    }

    fn calculate_revenue_share(
        &self,
        model: &RevenueShareModel,
        total_revenue: Money,
    ) -> Result<RevenueShareReport> {
        let share = |percentage| total_revenue.percentage(percentage).quantized();

        Ok(RevenueShareReport {
            owner_provider_id: model.owner_provider_id.clone(),
            product_class: model.product_class.clone(),
            algorithm_type: model.algorithm_type.clone(),
            owner_value: model.owner_value,
            owner_share: share(model.owner_value),
            aggregator_value: model.aggregator_value,
            aggregator_share: share(model.aggregator_value),
            stakeholders: model
                .stakeholders
                .iter()
                .map(|Stakeholder { stakeholder_id, stakeholder_value }| StakeholderShare {
                    stakeholder_id: stakeholder_id.clone(),
                    stakeholder_value: *stakeholder_value,
                    stakeholder_share: share(*stakeholder_value),
                })
                .collect(),
        })
    }
}
