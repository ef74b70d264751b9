pub mod accounting;
pub mod algorithms;
pub mod alteration;
pub mod money;
pub mod pricing;
pub mod resolver;
pub mod revenue;
pub mod sharing;

pub use accounting::{AccountingRecord, AppliedSdr, AppliedUsage};
pub use algorithms::{
    AlgorithmInfo, AlgorithmRegistry, FixedPercentage, RevenueShareAlgorithm, RevenueShareReport,
    StakeholderShare,
};
pub use alteration::{Alteration, AlterationCondition, AlterationKind, AlterationValue};
pub use money::Money;
pub use pricing::{PriceComponent, PricingModel, UsagePriceComponent};
pub use resolver::{PriceResolution, PriceResolver};
pub use revenue::{RevenueShareModel, RevenueShareModelUpdate, Stakeholder, DEFAULT_ALGORITHM};
pub use sharing::RevenueShareService;
