use crate::error::{BillingError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_ALGORITHM: &str = "FIXED_PERCENTAGE";

/// Party receiving a fixed percentage of the revenue besides the owner and
/// the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub stakeholder_id: String,
    pub stakeholder_value: Decimal,
}

/// Revenue-distribution model keyed by `(ownerProviderId, productClass)`.
///
/// Field names keep the camelCase wire form of the administrative API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueShareModel {
    pub owner_provider_id: String,
    pub product_class: String,
    #[serde(default = "default_algorithm")]
    pub algorithm_type: String,
    pub owner_value: Decimal,
    pub aggregator_value: Decimal,
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

/// Partial-field update document. Absent fields keep their stored value; the
/// merged snapshot is always re-validated in full before persisting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueShareModelUpdate {
    pub owner_provider_id: String,
    pub product_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stakeholders: Option<Vec<Stakeholder>>,
}

impl RevenueShareModel {
    pub fn stakeholder_value_sum(&self) -> Decimal {
        self.stakeholders
            .iter()
            .map(|stakeholder| stakeholder.stakeholder_value)
            .sum()
    }

    /// Enforces the distribution invariants on the complete document:
    /// every percentage in [0, 100], stakeholder ids pairwise distinct, and
    /// owner + aggregator + stakeholders summing to exactly 100.
    pub fn validate(&self) -> Result<()> {
        validate_percentage("ownerValue", self.owner_value)?;
        validate_percentage("aggregatorValue", self.aggregator_value)?;
        for stakeholder in &self.stakeholders {
            validate_percentage("stakeholderValue", stakeholder.stakeholder_value)?;
        }

        let mut seen = HashSet::new();
        for stakeholder in &self.stakeholders {
            if !seen.insert(stakeholder.stakeholder_id.as_str()) {
                return Err(BillingError::DuplicateStakeholder {
                    stakeholder_id: stakeholder.stakeholder_id.clone(),
                });
            }
        }

        let stakeholder_sum = self.stakeholder_value_sum();
        if self.owner_value + self.aggregator_value + stakeholder_sum != Decimal::ONE_HUNDRED {
            return Err(BillingError::PercentageSumMismatch {
                owner_value: self.owner_value,
                aggregator_value: self.aggregator_value,
                stakeholder_sum,
            });
        }

        debug!(
            owner_provider_id = %self.owner_provider_id,
            product_class = %self.product_class,
            "revenue sharing model validated"
        );
        Ok(())
    }

    /// Merges a partial update into this snapshot. Validation is the
    /// caller's next step, never skipped.
    pub fn apply_update(&mut self, update: RevenueShareModelUpdate) {
        if let Some(algorithm_type) = update.algorithm_type {
            self.algorithm_type = algorithm_type;
        }
        if let Some(owner_value) = update.owner_value {
            self.owner_value = owner_value;
        }
        if let Some(aggregator_value) = update.aggregator_value {
            self.aggregator_value = aggregator_value;
        }
        if let Some(stakeholders) = update.stakeholders {
            self.stakeholders = stakeholders;
        }
    }
}

fn validate_percentage(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(BillingError::PercentageOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}
