use chrono::Local;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIDENCE: f64 = 88.0;
pub const DEFAULT_MODEL: &str = "random_forest";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub up: f64,
    pub down: f64,
}

impl Default for Probabilities {
    fn default() -> Self {
        Self { up: 88.0, down: 12.0 }
    }
}

impl Probabilities {
    pub fn total(&self) -> f64 {
        self.up + self.down
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub direction: Direction,
    pub confidence: f64,
    pub probabilities: Probabilities,
    pub model: String,
    pub timestamp: String,
}

impl PredictionResult {
    /// The baseline every parse starts from, stamped now.
    pub fn baseline() -> Self {
        Self {
            direction: Direction::Up,
            confidence: DEFAULT_CONFIDENCE,
            probabilities: Probabilities::default(),
            model: DEFAULT_MODEL.to_string(),
            timestamp: now_timestamp(),
        }
    }

    pub fn stamp(mut self) -> Self {
        self.timestamp = now_timestamp();
        self
    }
}

pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let mut result = PredictionResult::baseline();
        result.timestamp = "2025-08-15 16:30:00".into();

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "direction": "UP",
                "confidence": 88.0,
                "probabilities": {"up": 88.0, "down": 12.0},
                "model": "random_forest",
                "timestamp": "2025-08-15 16:30:00"
            })
        );
    }

    #[test]
    fn test_timestamp_format() {
        let ts = now_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok(), "{}", ts);
    }
}
