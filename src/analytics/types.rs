use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub current_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub data_points: u64,
    pub feature_count: u64,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Model name -> evaluation scores. Ordered so repeated responses serialize identically.
pub type ModelMetrics = BTreeMap<String, ModelScore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_ignore_extra_fields() {
        let json = r#"{"svm": {"accuracy": 0.5, "precision": 0.4, "recall": 0.5, "f1": 0.45}}"#;
        let metrics: ModelMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics["svm"], ModelScore { accuracy: 0.5, precision: 0.4, recall: 0.5 });
    }

    #[test]
    fn test_snapshot_requires_all_fields() {
        let json = r#"{"current_price": 1.0, "price_change": 0.1}"#;
        assert!(serde_json::from_str::<DashboardSnapshot>(json).is_err());
    }
}
