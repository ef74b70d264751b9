use crate::domain::money::Money;
use crate::domain::pricing::PriceComponent;
use crate::error::{BillingError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use tracing::debug;

/// Conditional price adjustment applied after base accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alteration {
    #[serde(rename = "type")]
    pub kind: AlterationKind,
    pub value: AlterationValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<AlterationCondition>,
}

/// `"discount"` reduces the charge; any other tag is a surcharge added on
/// top, keeping the original documents' open `type` field valid. The
/// surcharge variant carries the document's tag verbatim so round-tripping a
/// document does not rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterationKind {
    Discount,
    Surcharge(String),
}

impl AlterationKind {
    pub fn surcharge() -> Self {
        AlterationKind::Surcharge("surcharge".to_string())
    }

    pub fn is_discount(&self) -> bool {
        *self == AlterationKind::Discount
    }
}

impl Serialize for AlterationKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AlterationKind::Discount => serializer.serialize_str("discount"),
            AlterationKind::Surcharge(tag) => serializer.serialize_str(tag),
        }
    }
}

impl<'de> Deserialize<'de> for AlterationKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(if tag == "discount" {
            AlterationKind::Discount
        } else {
            AlterationKind::Surcharge(tag)
        })
    }
}

/// Either explicit absolute amounts or a percentage of the running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlterationValue {
    Fixed(PriceComponent),
    Percentage(Decimal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterationCondition {
    pub operation: String,
    pub value: String,
}

/// Comparator selected by an alteration condition's `operation` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionOp {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl FromStr for ConditionOp {
    type Err = BillingError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "eq" => Ok(ConditionOp::Eq),
            "lt" => Ok(ConditionOp::Lt),
            "gt" => Ok(ConditionOp::Gt),
            "le" => Ok(ConditionOp::Le),
            "ge" => Ok(ConditionOp::Ge),
            other => Err(BillingError::UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

impl ConditionOp {
    fn holds(self, price: Money, threshold: Money) -> bool {
        match self {
            ConditionOp::Eq => price == threshold,
            ConditionOp::Lt => price < threshold,
            ConditionOp::Gt => price > threshold,
            ConditionOp::Le => price <= threshold,
            ConditionOp::Ge => price >= threshold,
        }
    }
}

/// Signed deltas produced by evaluating an alteration, plus whether its
/// condition held. The resolver marks the resolution altered whenever the
/// section was processed at all; `condition_met` is the distinct value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlterationOutcome {
    pub delta_price: Money,
    pub delta_duty_free: Money,
    pub condition_met: bool,
}

impl Alteration {
    /// Evaluates this clause against the running totals, once per resolution.
    /// An unsatisfied condition yields zero deltas.
    pub fn evaluate(&self, price: Money, duty_free: Money) -> Result<AlterationOutcome> {
        debug!(kind = ?self.kind, "processing alteration");

        if let Some(condition) = &self.condition {
            let op = ConditionOp::from_str(&condition.operation)?;
            let threshold = Money::parse("alteration.condition.value", &condition.value)?;

            if !op.holds(price, threshold) {
                debug!("alteration condition not satisfied");
                return Ok(AlterationOutcome {
                    delta_price: Money::zero(),
                    delta_duty_free: Money::zero(),
                    condition_met: false,
                });
            }
        }

        let (mut delta_price, mut delta_duty_free) = match &self.value {
            AlterationValue::Fixed(amount) => (
                Money::parse("alteration.value.value", &amount.value)?,
                Money::parse("alteration.value.duty_free", &amount.duty_free)?,
            ),
            AlterationValue::Percentage(percentage) => {
                (price.percentage(*percentage), duty_free.percentage(*percentage))
            }
        };

        if self.kind.is_discount() {
            delta_price = delta_price.negated();
            delta_duty_free = delta_duty_free.negated();
        }

        debug!(delta_price = %delta_price, delta_duty_free = %delta_duty_free, "processed alteration");

        Ok(AlterationOutcome {
            delta_price,
            delta_duty_free,
            condition_met: true,
        })
    }
}
