use tracing::debug;

use super::types::{Direction, PredictionResult, Probabilities};

const PREDICTION_LABEL: &str = "Prediction:";
const CONFIDENCE_LABEL: &str = "Confidence:";
const PROBABILITIES_LABEL: &str = "Probabilities:";
const MODEL_LABEL: &str = "Model:";

/// Extract a prediction from the human-readable log of the prediction script.
///
/// Each line is checked against the markers in a fixed order and only the first
/// marker found on a line is used. Later lines overwrite earlier values of the
/// same field. Anything that fails to parse is skipped, so the result always
/// starts from `PredictionResult::baseline()` and is never partially empty.
pub fn parse_transcript(stdout: &str) -> PredictionResult {
    let mut result = PredictionResult::baseline();

    for line in stdout.lines() {
        if line.contains(PREDICTION_LABEL) {
            if line.contains("UP") {
                result.direction = Direction::Up;
            } else if line.contains("DOWN") {
                result.direction = Direction::Down;
            }
        } else if line.contains(CONFIDENCE_LABEL) {
            match segment_after(line, CONFIDENCE_LABEL).and_then(parse_percent) {
                Some(confidence) => result.confidence = confidence,
                None => debug!("Ignoring unparseable confidence line: {}", line.trim()),
            }
        } else if line.contains(PROBABILITIES_LABEL) {
            if line.contains("UP") && line.contains("DOWN") {
                match parse_probabilities(line) {
                    Some(probabilities) => result.probabilities = probabilities,
                    None => debug!("Ignoring unparseable probabilities line: {}", line.trim()),
                }
            }
        } else if line.contains(MODEL_LABEL) {
            if let Some(model) = segment_after(line, MODEL_LABEL) {
                result.model = model.trim().to_string();
            }
        }
    }

    let total = result.probabilities.total();
    if (total - 100.0).abs() > 1.0 {
        debug!("Probabilities sum to {:.2}, not 100", total);
    }

    result.stamp()
}

fn parse_probabilities(line: &str) -> Option<Probabilities> {
    let values = segment_after(line, PROBABILITIES_LABEL)?;
    let up = segment_after(values, "UP").and_then(parse_percent)?;
    let down = segment_after(values, "DOWN").and_then(parse_percent)?;
    Some(Probabilities { up, down })
}

/// Text between the first occurrence of `label` and the next one (or end of line).
fn segment_after<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(label)?;
    rest.split(label).next()
}

/// Leading number of `text`, cut at the first `%`.
fn parse_percent(text: &str) -> Option<f64> {
    text.split('%')
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::types::{DEFAULT_CONFIDENCE, DEFAULT_MODEL};

    fn assert_baseline(result: &PredictionResult) {
        assert_eq!(result.direction, Direction::Up);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(result.probabilities, Probabilities { up: 88.0, down: 12.0 });
        assert_eq!(result.model, DEFAULT_MODEL);
        assert!(!result.timestamp.is_empty());
    }

    #[test]
    fn test_empty_and_unrelated_input_yield_baseline() {
        assert_baseline(&parse_transcript(""));
        assert_baseline(&parse_transcript("Loading data...\nTraining 3 models\nDone.\n"));
    }

    #[test]
    fn test_full_transcript() {
        let out = "\
🤖 Selected Model: svm
📈 Prediction: DOWN
🎯 Confidence: 61.25%
📊 Probabilities: UP 38.75% | DOWN 61.25%
";
        let result = parse_transcript(out);
        assert_eq!(result.direction, Direction::Down);
        assert_eq!(result.confidence, 61.25);
        assert_eq!(result.probabilities, Probabilities { up: 38.75, down: 61.25 });
        assert_eq!(result.model, "svm");
    }

    #[test]
    fn test_confidence() {
        assert_eq!(parse_transcript("Confidence: 73.5%").confidence, 73.5);
        assert_eq!(parse_transcript("Confidence: high%").confidence, DEFAULT_CONFIDENCE);
        assert_eq!(parse_transcript("Confidence: NaN%").confidence, DEFAULT_CONFIDENCE);
        // Malformed later line keeps the earlier value
        let out = "Confidence: 70%\nConfidence: ??%";
        assert_eq!(parse_transcript(out).confidence, 70.0);
    }

    #[test]
    fn test_probabilities_need_both_tokens() {
        let result = parse_transcript("Probabilities: UP 55.0%");
        assert_eq!(result.probabilities, Probabilities { up: 88.0, down: 12.0 });

        let result = parse_transcript("Probabilities: DOWN 45.0%");
        assert_eq!(result.probabilities, Probabilities { up: 88.0, down: 12.0 });
    }

    #[test]
    fn test_probabilities_discard_whole_pair_on_error() {
        let result = parse_transcript("Probabilities: UP 55.0% DOWN abc%");
        assert_eq!(result.probabilities, Probabilities { up: 88.0, down: 12.0 });

        // Tokens only before the label do not count as values
        let result = parse_transcript("UP/DOWN Probabilities: pending");
        assert_eq!(result.probabilities, Probabilities { up: 88.0, down: 12.0 });
    }

    #[test]
    fn test_probabilities_are_not_normalised() {
        let result = parse_transcript("Probabilities: UP 70% DOWN 70%");
        assert_eq!(result.probabilities, Probabilities { up: 70.0, down: 70.0 });
    }

    #[test]
    fn test_last_match_wins() {
        let out = "Prediction: DOWN\nModel: svm\nPrediction: UP\nModel:   hybrid  \nConfidence: 51%\nConfidence: 52%";
        let result = parse_transcript(out);
        assert_eq!(result.direction, Direction::Up);
        assert_eq!(result.model, "hybrid");
        assert_eq!(result.confidence, 52.0);
    }

    #[test]
    fn test_direction_without_token_keeps_prior() {
        let out = "Prediction: DOWN\nPrediction: undecided";
        assert_eq!(parse_transcript(out).direction, Direction::Down);
    }

    #[test]
    fn test_first_marker_on_a_line_wins() {
        // Treated as a direction line only, so confidence is untouched
        let result = parse_transcript("Prediction: DOWN Confidence: 12%");
        assert_eq!(result.direction, Direction::Down);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_empty_model_payload_is_kept() {
        assert_eq!(parse_transcript("Model:   ").model, "");
        assert_eq!(parse_transcript("Model: svm\nModel:").model, "");
    }

    #[test]
    fn test_segment_after() {
        assert_eq!(segment_after("a: 1 a: 2", "a:"), Some(" 1 "));
        assert_eq!(segment_after("none", "a:"), None);
    }
}
