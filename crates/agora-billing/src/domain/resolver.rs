use crate::domain::accounting::{apply_usage, AccountingRecord, AppliedSdr};
use crate::domain::money::Money;
use crate::domain::pricing::{PriceComponent, PricingModel};
use crate::error::Result;
use tracing::debug;

/// Stateless price resolver; every call produces a fresh [`PriceResolution`]
/// owning its own audit trail, so instances can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceResolver;

/// Outcome of a single resolution: the quantized totals, the per-component
/// audit trail and the alteration flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceResolution {
    price: Money,
    duty_free: Money,
    applied_sdrs: Vec<AppliedSdr>,
    altered: bool,
}

impl PriceResolution {
    /// Final charge, always rendered with two fraction digits.
    pub fn price(&self) -> String {
        self.price.to_string()
    }

    /// Tax-exempt portion of the charge, two fraction digits. Unlike the
    /// price it is not clamped at zero.
    pub fn duty_free(&self) -> String {
        self.duty_free.to_string()
    }

    pub fn price_amount(&self) -> Money {
        self.price
    }

    pub fn duty_free_amount(&self) -> Money {
        self.duty_free
    }

    /// Audit trail: one entry per pay-per-use component of the model.
    pub fn applied_sdrs(&self) -> &[AppliedSdr] {
        &self.applied_sdrs
    }

    /// True whenever the model carried an alteration section, whether or not
    /// its condition held.
    pub fn is_altered(&self) -> bool {
        self.altered
    }
}

impl PriceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Calculates the charge for `pricing_model` given the metered
    /// `accounting_info`, in fixed order: single payments, subscriptions,
    /// pay-per-use, then the optional alteration against the running totals.
    /// A negative final price clamps to zero; duty_free deliberately does
    /// not.
    pub fn resolve_price(
        &self,
        pricing_model: &PricingModel,
        accounting_info: &[AccountingRecord],
    ) -> Result<PriceResolution> {
        debug!("calculating price");

        let mut price = Money::zero();
        let mut duty_free = Money::zero();

        for payment in &pricing_model.single_payment {
            let (value, exempt) = parse_component("single_payment", payment)?;
            price = price.add(value);
            duty_free = duty_free.add(exempt);
        }

        // Subscriptions arrive as pre-computed flat amounts; no proration
        // happens at resolution time.
        for payment in &pricing_model.subscription {
            let (value, exempt) = parse_component("subscription", payment)?;
            price = price.add(value);
            duty_free = duty_free.add(exempt);
        }

        let mut applied_sdrs = Vec::with_capacity(pricing_model.pay_per_use.len());
        for component in &pricing_model.pay_per_use {
            let sdr = apply_usage(component, accounting_info)?;
            price = price.add(sdr.price);
            duty_free = duty_free.add(sdr.duty_free);
            applied_sdrs.push(sdr);
        }

        let mut altered = false;
        if let Some(alteration) = &pricing_model.alteration {
            let outcome = alteration.evaluate(price, duty_free)?;
            price = price.add(outcome.delta_price);
            duty_free = duty_free.add(outcome.delta_duty_free);
            altered = true;

            debug!(condition_met = outcome.condition_met, "alteration processed");
        }

        // Too many deductions: the charge floors at zero, the duty-free
        // accounting value stays as computed.
        if price.is_negative() {
            price = Money::zero();
        }

        let resolution = PriceResolution {
            price: price.quantized(),
            duty_free: duty_free.quantized(),
            applied_sdrs,
            altered,
        };

        debug!(price = %resolution.price, duty_free = %resolution.duty_free, "calculated price");
        Ok(resolution)
    }
}

fn parse_component(section: &str, payment: &PriceComponent) -> Result<(Money, Money)> {
    Ok((
        Money::parse(&format!("{section}.value"), &payment.value)?,
        Money::parse(&format!("{section}.duty_free"), &payment.duty_free)?,
    ))
}
