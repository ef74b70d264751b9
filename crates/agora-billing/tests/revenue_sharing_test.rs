//! Service-level tests for revenue-sharing model administration and share
//! calculation, run against the in-memory repository.

use agora_billing::domain::{
    Money, RevenueShareModel, RevenueShareModelUpdate, RevenueShareService, Stakeholder,
    DEFAULT_ALGORITHM,
};
use agora_billing::storage::{InMemoryRevenueShareRepository, ListModelsFilter};
use agora_billing::{BillingConfig, BillingError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn service() -> RevenueShareService {
    RevenueShareService::new(
        Arc::new(InMemoryRevenueShareRepository::new()),
        BillingConfig::default(),
    )
}

fn model(
    owner_provider_id: &str,
    product_class: &str,
    owner_value: Decimal,
    aggregator_value: Decimal,
    stakeholders: Vec<Stakeholder>,
) -> RevenueShareModel {
    RevenueShareModel {
        owner_provider_id: owner_provider_id.to_string(),
        product_class: product_class.to_string(),
        algorithm_type: DEFAULT_ALGORITHM.to_string(),
        owner_value,
        aggregator_value,
        stakeholders,
    }
}

fn stakeholder(id: &str, value: Decimal) -> Stakeholder {
    Stakeholder {
        stakeholder_id: id.to_string(),
        stakeholder_value: value,
    }
}

#[test_log::test(tokio::test)]
async fn create_and_fetch_model() {
    let service = service();

    let created = service
        .create_model(model("provider", "class", dec!(70), dec!(30), vec![]))
        .await
        .unwrap();
    assert_eq!(created.algorithm_type, DEFAULT_ALGORITHM);

    let fetched = service.get_model("provider", "class").await.unwrap();
    assert_eq!(fetched, created);
}

#[test_log::test(tokio::test)]
async fn create_rejects_invalid_sum() {
    let service = service();

    let err = service
        .create_model(model(
            "provider",
            "class",
            dec!(60),
            dec!(30),
            vec![stakeholder("st1", dec!(20))],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::PercentageSumMismatch { .. }));
    assert_eq!(err.status_code(), 400);
}

#[test_log::test(tokio::test)]
async fn create_rejects_duplicate_key() {
    let service = service();
    service
        .create_model(model("provider", "class", dec!(70), dec!(30), vec![]))
        .await
        .unwrap();

    let err = service
        .create_model(model("provider", "class", dec!(50), dec!(50), vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::ModelExists { .. }));
    assert_eq!(err.status_code(), 400);
}

#[test_log::test(tokio::test)]
async fn partial_update_merges_and_revalidates() {
    let service = service();
    service
        .create_model(model("provider", "class", dec!(70), dec!(30), vec![]))
        .await
        .unwrap();

    let updated = service
        .update_model(RevenueShareModelUpdate {
            owner_provider_id: "provider".to_string(),
            product_class: "class".to_string(),
            owner_value: Some(dec!(60)),
            stakeholders: Some(vec![
                stakeholder("st1", dec!(5)),
                stakeholder("st2", dec!(5)),
            ]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.owner_value, dec!(60));
    // Untouched fields survive the merge.
    assert_eq!(updated.aggregator_value, dec!(30));
    assert_eq!(updated.stakeholders.len(), 2);
}

#[test_log::test(tokio::test)]
async fn update_rejecting_stale_sum_leaves_model_unchanged() {
    let service = service();
    service
        .create_model(model("provider", "class", dec!(70), dec!(30), vec![]))
        .await
        .unwrap();

    let err = service
        .update_model(RevenueShareModelUpdate {
            owner_provider_id: "provider".to_string(),
            product_class: "class".to_string(),
            stakeholders: Some(vec![stakeholder("st1", dec!(30))]),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::PercentageSumMismatch { .. }));

    let stored = service.get_model("provider", "class").await.unwrap();
    assert!(stored.stakeholders.is_empty());
}

#[test_log::test(tokio::test)]
async fn update_of_missing_model_is_not_found() {
    let service = service();

    let err = service
        .update_model(RevenueShareModelUpdate {
            owner_provider_id: "provider".to_string(),
            product_class: "class".to_string(),
            owner_value: Some(dec!(70)),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BillingError::ModelNotFound { .. }));
    assert_eq!(err.status_code(), 404);
}

#[test_log::test(tokio::test)]
async fn list_models_filters_and_paginates() {
    let service = service();
    for product_class in ["apps", "books", "music", "video"] {
        service
            .create_model(model("provider", product_class, dec!(70), dec!(30), vec![]))
            .await
            .unwrap();
    }
    service
        .create_model(model("other", "apps", dec!(50), dec!(50), vec![]))
        .await
        .unwrap();

    let listed = service
        .list_models(ListModelsFilter {
            owner_provider_id: Some("provider".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 4);

    let page = service
        .list_models(ListModelsFilter {
            owner_provider_id: Some("provider".to_string()),
            offset: Some(2),
            size: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].product_class, "music");

    let empty = service
        .list_models(ListModelsFilter {
            owner_provider_id: Some("absent".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[test_log::test(tokio::test)]
async fn calculate_shares_through_registry() {
    let service = service();
    service
        .create_model(model(
            "provider",
            "class",
            dec!(50),
            dec!(30),
            vec![stakeholder("st1", dec!(10)), stakeholder("st2", dec!(10))],
        ))
        .await
        .unwrap();

    let report = service
        .calculate_shares("provider", "class", Money::from_decimal(dec!(200.00)))
        .await
        .unwrap();

    assert_eq!(report.owner_share.to_string(), "100.00");
    assert_eq!(report.aggregator_share.to_string(), "60.00");
    assert_eq!(report.stakeholders.len(), 2);
    assert_eq!(report.stakeholders[0].stakeholder_share.to_string(), "20.00");
}

#[test_log::test(tokio::test)]
async fn calculate_shares_with_unregistered_algorithm_fails() {
    let service = service();
    let mut custom = model("provider", "class", dec!(70), dec!(30), vec![]);
    custom.algorithm_type = "BESPOKE".to_string();
    service.create_model(custom).await.unwrap();

    let err = service
        .calculate_shares("provider", "class", Money::from_decimal(dec!(10.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::UnknownAlgorithm { .. }));
}

#[test_log::test(tokio::test)]
async fn list_algorithms_exposes_metadata() {
    let algorithms = service().list_algorithms();
    assert_eq!(algorithms.len(), 1);
    assert_eq!(algorithms[0].id, "FIXED_PERCENTAGE");
    assert_eq!(algorithms[0].name, "Fixed Percentage Algorithm");
}
