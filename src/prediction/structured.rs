use serde::Deserialize;

use super::types::{Direction, PredictionResult, Probabilities};

/// One-line JSON record a prediction script can print instead of (or after) its log.
///
/// `{"direction": "DOWN", "confidence": 61.2, "probabilities": {"up": 38.8, "down": 61.2}, "model": "svm"}`
#[derive(Debug, Deserialize)]
struct PredictionRecord {
    direction: Direction,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    probabilities: Option<Probabilities>,
    #[serde(default)]
    model: Option<String>,
}

/// Last line of `stdout` that is a prediction record, with absent fields taken
/// from the baseline. `None` when no such line exists.
pub fn parse_record(stdout: &str) -> Option<PredictionResult> {
    let record = stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .find_map(|line| serde_json::from_str::<PredictionRecord>(line).ok())?;

    let mut result = PredictionResult::baseline();
    result.direction = record.direction;
    if let Some(confidence) = record.confidence {
        result.confidence = confidence;
    }
    if let Some(probabilities) = record.probabilities {
        result.probabilities = probabilities;
    }
    if let Some(model) = record.model.filter(|m| !m.trim().is_empty()) {
        result.model = model.trim().to_string();
    }
    Some(result.stamp())
}
