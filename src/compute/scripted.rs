use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

use super::backend::ComputeBackend;
use super::outcome::{FailureCause, InvocationOutcome};
use super::programs::{Computation, ComputationKind};
use crate::analytics::FallbackCatalog;

/// Sample transcript in the format the prediction script logs.
pub const DEMO_PREDICTION_TRANSCRIPT: &str = "\
🚀 FTSE 100 Quantum ML Demo
📊 Loaded 1261 trading days, 60 features
🤖 Selected Model: random_forest

📈 Prediction: UP
🎯 Confidence: 88.0%
📊 Probabilities: UP 88.0% | DOWN 12.0%
";

/// Replays canned outcomes instead of spawning processes.
///
/// Used for simulation mode (front-end work without a Python environment) and tests.
pub struct ScriptedBackend {
    outcomes: HashMap<ComputationKind, InvocationOutcome>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Demo transcript for predictions, catalog values for the data endpoints.
    pub fn demo(catalog: &FallbackCatalog) -> Self {
        let dashboard = serde_json::to_string(&catalog.dashboard).unwrap_or_default();
        let models = serde_json::to_string(&catalog.models).unwrap_or_default();
        Self::new()
            .with_stdout(ComputationKind::Prediction, DEMO_PREDICTION_TRANSCRIPT)
            .with_stdout(ComputationKind::DashboardData, &dashboard)
            .with_stdout(ComputationKind::ModelTraining, &models)
    }

    pub fn with_outcome(mut self, kind: ComputationKind, outcome: InvocationOutcome) -> Self {
        self.outcomes.insert(kind, outcome);
        self
    }

    pub fn with_stdout(self, kind: ComputationKind, stdout: &str) -> Self {
        self.with_outcome(
            kind,
            InvocationOutcome::Success {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: 0,
            },
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputeBackend for ScriptedBackend {
    async fn invoke(&self, computation: &Computation, timeout: Duration) -> InvocationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info!("🎞️  Replaying scripted {} (timeout {}s)", computation.kind.as_str(), timeout.as_secs());
        self.outcomes
            .get(&computation.kind)
            .cloned()
            .unwrap_or_else(|| InvocationOutcome::Failure {
                stderr: format!("no scripted outcome for {}", computation.kind.as_str()),
                exit_code: None,
                cause: FailureCause::Launch,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_and_counts() {
        let backend = ScriptedBackend::new().with_stdout(ComputationKind::Prediction, "Model: svm");
        let predict = Computation::inline(ComputationKind::Prediction, "python3", "");
        let models = Computation::inline(ComputationKind::ModelTraining, "python3", "");

        let outcome = backend.invoke(&predict, Duration::from_secs(1)).await;
        assert_eq!(outcome.into_stdout().unwrap(), "Model: svm");

        let missing = backend.invoke(&models, Duration::from_secs(1)).await;
        assert_eq!(missing.label(), "failure");
        assert_eq!(backend.call_count(), 2);
    }
}
