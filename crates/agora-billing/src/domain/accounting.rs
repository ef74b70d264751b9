use crate::domain::money::Money;
use crate::domain::pricing::UsagePriceComponent;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metered usage event reported by the usage-tracking subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingRecord {
    pub usage_id: String,
    pub unit: String,
    pub value: String,
}

/// Charge computed for a single matched usage event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedUsage {
    pub usage_id: String,
    pub value: String,
    pub price: Money,
    pub duty_free: Money,
}

/// Audit entry pairing a pay-per-use component with the accounting records it
/// matched. One entry exists per component even when nothing matched; amounts
/// keep the raw scale of the multiplication, quantization happens only on the
/// resolution totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedSdr {
    pub model: UsagePriceComponent,
    pub accounting: Vec<AppliedUsage>,
    pub price: Money,
    pub duty_free: Money,
}

/// Pairs `records` against `component` by case-insensitive unit label and
/// sums the per-event charges into the component's partial totals.
pub fn apply_usage(
    component: &UsagePriceComponent,
    records: &[AccountingRecord],
) -> Result<AppliedSdr> {
    debug!(unit = %component.unit, "matching accounting records");

    let unit_price = Money::parse("pay_per_use.value", &component.value)?;
    let unit_duty_free = Money::parse("pay_per_use.duty_free", &component.duty_free)?;

    let mut partial_price = Money::zero();
    let mut partial_duty_free = Money::zero();
    let mut accounting = Vec::new();

    for record in records {
        if !record.unit.eq_ignore_ascii_case(&component.unit) {
            continue;
        }

        let units = Money::parse("accounting.value", &record.value)?;
        let price = unit_price.multiply(units.as_decimal());
        let duty_free = unit_duty_free.multiply(units.as_decimal());

        partial_price = partial_price.add(price);
        partial_duty_free = partial_duty_free.add(duty_free);

        accounting.push(AppliedUsage {
            usage_id: record.usage_id.clone(),
            value: record.value.clone(),
            price,
            duty_free,
        });
    }

    debug!(
        unit = %component.unit,
        matched = accounting.len(),
        price = %partial_price,
        duty_free = %partial_duty_free,
        "processed pay-per-use component"
    );

    Ok(AppliedSdr {
        model: component.clone(),
        accounting,
        price: partial_price,
        duty_free: partial_duty_free,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BillingError;
    use rust_decimal_macros::dec;

    fn call_component() -> UsagePriceComponent {
        UsagePriceComponent {
            unit: "call".to_string(),
            value: "0.10".to_string(),
            duty_free: "0.08".to_string(),
        }
    }

    fn record(usage_id: &str, unit: &str, value: &str) -> AccountingRecord {
        AccountingRecord {
            usage_id: usage_id.to_string(),
            unit: unit.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_unit_match_is_case_insensitive() {
        let sdr = apply_usage(&call_component(), &[record("u1", "CALL", "50")]).unwrap();

        assert_eq!(sdr.accounting.len(), 1);
        assert_eq!(sdr.price.as_decimal(), dec!(5.00));
        assert_eq!(sdr.duty_free.as_decimal(), dec!(4.00));
        assert_eq!(sdr.accounting[0].usage_id, "u1");
    }

    #[test]
    fn test_non_matching_units_are_skipped() {
        let records = [record("u1", "megabyte", "100"), record("u2", "call", "3")];
        let sdr = apply_usage(&call_component(), &records).unwrap();

        assert_eq!(sdr.accounting.len(), 1);
        assert_eq!(sdr.accounting[0].usage_id, "u2");
        assert_eq!(sdr.price.as_decimal(), dec!(0.30));
    }

    #[test]
    fn test_empty_accounting_yields_zero_entry() {
        let sdr = apply_usage(&call_component(), &[]).unwrap();

        assert!(sdr.accounting.is_empty());
        assert_eq!(sdr.price, Money::zero());
        assert_eq!(sdr.duty_free, Money::zero());
        assert_eq!(sdr.model, call_component());
    }

    #[test]
    fn test_malformed_record_value_is_reported() {
        let err = apply_usage(&call_component(), &[record("u1", "call", "five")]).unwrap_err();
        assert!(matches!(err, BillingError::InvalidDecimal { ref field, .. } if field == "accounting.value"));
    }
}
