use serde::{Deserialize, Serialize};

use super::types::{DashboardSnapshot, DateRange, ModelMetrics, ModelScore};

/// Values served when live computation is unavailable.
///
/// These are a hardcoded snapshot (FTSE 100, August 2025) and go stale; they are
/// approximations, not live data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackCatalog {
    pub dashboard: DashboardSnapshot,
    pub models: ModelMetrics,
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self {
            dashboard: default_dashboard(),
            models: default_models(),
        }
    }
}

pub fn default_dashboard() -> DashboardSnapshot {
    DashboardSnapshot {
        current_price: 9138.90,
        price_change: 45.20,
        price_change_percent: 0.50,
        data_points: 1261,
        feature_count: 60,
        date_range: DateRange {
            start: "2020-08-17".to_string(),
            end: "2025-08-15".to_string(),
        },
    }
}

pub fn default_models() -> ModelMetrics {
    [
        ("random_forest", 0.5597, 0.5573, 0.5597),
        ("hybrid", 0.5309, 0.5160, 0.5309),
        ("svm", 0.5350, 0.2862, 0.5350),
    ]
    .into_iter()
    .map(|(name, accuracy, precision, recall)| {
        (name.to_string(), ModelScore { accuracy, precision, recall })
    })
    .collect()
}
