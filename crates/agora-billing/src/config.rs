use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration, merged from defaults, an optional TOML file and
/// `AGORA_BILLING_` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub listing: ListingConfig,
}

/// Pagination applied when listing revenue-sharing models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_offset: usize,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            listing: ListingConfig {
                default_offset: 0,
                default_page_size: 10,
                max_page_size: 100,
            },
        }
    }
}

impl BillingConfig {
    pub fn load(path: Option<PathBuf>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(BillingConfig::default()));

        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed("AGORA_BILLING_").split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BillingConfig::load(None).unwrap();
        assert_eq!(config.listing.default_offset, 0);
        assert_eq!(config.listing.default_page_size, 10);
        assert_eq!(config.listing.max_page_size, 100);
    }
}
