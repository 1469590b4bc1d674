//! Practice service configuration.

use std::env;
use std::str::FromStr;

use common::{NutritionConfig, PaginationConfig};

/// Practice service configuration.
#[derive(Debug, Clone)]
pub struct PracticeServiceConfig {
    /// Calculator defaults
    pub nutrition: NutritionConfig,
    /// Page size limits for list queries
    pub pagination: PaginationConfig,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

/// Parse an environment variable, falling back on absence or bad input.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

impl PracticeServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let nutrition = NutritionConfig::default();
        let pagination = PaginationConfig::default();

        Self {
            nutrition: NutritionConfig {
                activity_level: env_or("PRACTICE_ACTIVITY_LEVEL", nutrition.activity_level),
                protein_pct: env_or("PRACTICE_PROTEIN_PCT", nutrition.protein_pct),
                carbs_pct: env_or("PRACTICE_CARBS_PCT", nutrition.carbs_pct),
                fat_pct: env_or("PRACTICE_FAT_PCT", nutrition.fat_pct),
                compliance_tolerance_pct: env_or(
                    "PRACTICE_COMPLIANCE_TOLERANCE",
                    nutrition.compliance_tolerance_pct,
                ),
            },
            pagination: PaginationConfig {
                default_page_size: env_or("PRACTICE_PAGE_SIZE", pagination.default_page_size),
                max_page_size: env_or("PRACTICE_MAX_PAGE_SIZE", pagination.max_page_size),
            },
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for PracticeServiceConfig {
    fn default() -> Self {
        Self {
            nutrition: NutritionConfig::default(),
            pagination: PaginationConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_and_fallbacks() {
        env::set_var("PRACTICE_ACTIVITY_LEVEL", "1.55");
        env::set_var("PRACTICE_MAX_PAGE_SIZE", "not-a-number");

        let config = PracticeServiceConfig::from_env();
        assert_eq!(config.nutrition.activity_level, 1.55);
        assert_eq!(config.pagination.max_page_size, 100);
        assert_eq!(config.nutrition.protein_pct, 30.0);

        env::remove_var("PRACTICE_ACTIVITY_LEVEL");
        env::remove_var("PRACTICE_MAX_PAGE_SIZE");
    }
}
