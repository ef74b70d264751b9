pub mod revenue_models;

pub use revenue_models::{
    InMemoryRevenueShareRepository, ListModelsFilter, ModelKey, RevenueShareModelRepository,
};
