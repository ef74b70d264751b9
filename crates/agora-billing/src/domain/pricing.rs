use crate::domain::alteration::Alteration;
use serde::{Deserialize, Serialize};

/// Declarative pricing model supplied by the ordering subsystem.
///
/// Monetary fields stay decimal strings at this layer; the resolver parses
/// them so that a malformed amount surfaces as
/// [`BillingError::InvalidDecimal`](crate::BillingError::InvalidDecimal)
/// naming the offending field. Absent sections contribute zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingModel {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub single_payment: Vec<PriceComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscription: Vec<PriceComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pay_per_use: Vec<UsagePriceComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alteration: Option<Alteration>,
}

/// Flat charge; used for both one-time payments and subscriptions, which are
/// billed identically at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceComponent {
    pub value: String,
    pub duty_free: String,
}

/// Usage-based pricing rule, charged per consumed unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePriceComponent {
    pub unit: String,
    pub value: String,
    pub duty_free: String,
}
