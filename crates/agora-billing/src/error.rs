use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BillingError>;

/// Failures reported by the charging and revenue-sharing engines.
///
/// Every variant carries enough structure for the HTTP collaborator to build
/// a precise response; nothing is silently defaulted and the engines never
/// retry on their own.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("field `{field}` is not a valid decimal number: `{value}`")]
    InvalidDecimal { field: String, value: String },

    #[error("unsupported condition operation `{operation}`")]
    UnknownOperation { operation: String },

    #[error("all stakeholders must be unique, `{stakeholder_id}` appears more than once")]
    DuplicateStakeholder { stakeholder_id: String },

    #[error(
        "the sum of percentages for the aggregator, owner and stakeholders must equal 100. \
         {aggregator_value} + {owner_value} + {stakeholder_sum} != 100"
    )]
    PercentageSumMismatch {
        owner_value: Decimal,
        aggregator_value: Decimal,
        stakeholder_sum: Decimal,
    },

    #[error("field `{field}` must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: String, value: Decimal },

    #[error("unknown revenue-sharing algorithm `{algorithm}`")]
    UnknownAlgorithm { algorithm: String },

    #[error("revenue sharing model does not exist for provider `{owner_provider_id}` and product class `{product_class}`")]
    ModelNotFound {
        owner_provider_id: String,
        product_class: String,
    },

    #[error("revenue sharing model already exists for provider `{owner_provider_id}` and product class `{product_class}`")]
    ModelExists {
        owner_provider_id: String,
        product_class: String,
    },

    #[error("storage operation `{operation}` failed: {source}")]
    StorageError {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BillingError {
    /// HTTP status the administrative boundary maps this failure to.
    pub fn status_code(&self) -> u16 {
        match self {
            BillingError::InvalidDecimal { .. }
            | BillingError::UnknownOperation { .. }
            | BillingError::DuplicateStakeholder { .. }
            | BillingError::PercentageSumMismatch { .. }
            | BillingError::PercentageOutOfRange { .. }
            | BillingError::UnknownAlgorithm { .. }
            | BillingError::ModelExists { .. } => 400,
            BillingError::ModelNotFound { .. } => 404,
            BillingError::StorageError { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_code_mapping() {
        let validation = BillingError::PercentageSumMismatch {
            owner_value: dec!(60),
            aggregator_value: dec!(30),
            stakeholder_sum: dec!(20),
        };
        assert_eq!(validation.status_code(), 400);

        let missing = BillingError::ModelNotFound {
            owner_provider_id: "provider".to_string(),
            product_class: "class".to_string(),
        };
        assert_eq!(missing.status_code(), 404);
    }

    #[test]
    fn test_sum_mismatch_message_carries_offending_numbers() {
        let err = BillingError::PercentageSumMismatch {
            owner_value: dec!(60),
            aggregator_value: dec!(30),
            stakeholder_sum: dec!(20),
        };
        assert_eq!(
            err.to_string(),
            "the sum of percentages for the aggregator, owner and stakeholders \
             must equal 100. 30 + 60 + 20 != 100"
        );
    }
}
