use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

use crate::analytics::{DashboardSnapshot, FallbackCatalog, ModelMetrics, Sourced};
use crate::compute::programs::{DASHBOARD_PROGRAM, MODELS_PROGRAM};
use crate::compute::{decode_record, Computation, ComputationKind, ComputeBackend};
use crate::config::ComputeConfig;
use crate::error::InvocationError;
use crate::prediction::{OutputParser, PredictionParser, PredictionResult};

/// Composes the compute backend with output parsing and fallback substitution.
///
/// Holds no per-request state; every call launches its own computation.
pub struct ComputeService {
    backend: Arc<dyn ComputeBackend>,
    parser: Box<dyn OutputParser>,
    config: ComputeConfig,
    fallback: FallbackCatalog,
}

impl ComputeService {
    pub fn new(backend: Arc<dyn ComputeBackend>, config: ComputeConfig, fallback: FallbackCatalog) -> Self {
        let parser = Box::new(PredictionParser::new(config.output_format));
        Self {
            backend,
            parser,
            config,
            fallback,
        }
    }

    pub fn fallback(&self) -> &FallbackCatalog {
        &self.fallback
    }

    pub fn computation(&self, kind: ComputationKind) -> Computation {
        let python = &self.config.python_bin;
        let computation = match kind {
            ComputationKind::Prediction => Computation::script(kind, python, &self.config.predict_script),
            ComputationKind::DashboardData => Computation::inline(kind, python, DASHBOARD_PROGRAM),
            ComputationKind::ModelTraining => Computation::inline(kind, python, MODELS_PROGRAM),
        };
        computation.in_dir(&self.config.workdir)
    }

    /// Run the prediction script. Failures are returned, never masked.
    pub async fn predict(&self) -> Result<PredictionResult, InvocationError> {
        let stdout = self.run(ComputationKind::Prediction).await?;
        Ok(self.parser.parse(&stdout))
    }

    /// Live dashboard snapshot, or the whole fallback snapshot on any failure.
    pub async fn dashboard_data(&self) -> Sourced<DashboardSnapshot> {
        self.live_or_fallback(ComputationKind::DashboardData, || self.fallback.dashboard.clone())
            .await
    }

    /// Live model metrics, or exactly the fallback metrics on any failure.
    pub async fn model_metrics(&self) -> Sourced<ModelMetrics> {
        self.live_or_fallback(ComputationKind::ModelTraining, || self.fallback.models.clone())
            .await
    }

    async fn run(&self, kind: ComputationKind) -> Result<String, InvocationError> {
        let computation = self.computation(kind);
        let timeout = self.config.timeout_for(kind);
        self.backend.invoke(&computation, timeout).await.into_stdout()
    }

    async fn live_or_fallback<T, F>(&self, kind: ComputationKind, fallback: F) -> Sourced<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let decoded = match self.run(kind).await {
            Ok(stdout) => decode_record::<T>(&stdout),
            Err(e) => Err(e),
        };

        match decoded {
            Ok(data) => Sourced::Live(data),
            Err(e) => {
                warn!("⚠️ Serving fallback {} data: {}", kind.as_str(), e);
                Sourced::Fallback(fallback(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{FailureCause, InvocationOutcome, ScriptedBackend};
    use crate::prediction::Direction;

    fn service(backend: ScriptedBackend) -> ComputeService {
        ComputeService::new(Arc::new(backend), ComputeConfig::default(), FallbackCatalog::default())
    }

    #[tokio::test]
    async fn test_predict_parses_stdout() {
        let backend = ScriptedBackend::new().with_stdout(
            ComputationKind::Prediction,
            "Prediction: DOWN\nConfidence: 64.0%\nProbabilities: UP 36.0% DOWN 64.0%\nModel: hybrid\n",
        );
        let result = service(backend).predict().await.unwrap();
        assert_eq!(result.direction, Direction::Down);
        assert_eq!(result.confidence, 64.0);
        assert_eq!(result.model, "hybrid");
    }

    #[tokio::test]
    async fn test_predict_surfaces_failures() {
        let backend = ScriptedBackend::new()
            .with_outcome(ComputationKind::Prediction, InvocationOutcome::Timeout { timeout_ms: 60000 });
        let err = service(backend).predict().await.unwrap_err();
        assert_eq!(err, InvocationError::TimeoutExceeded { timeout_ms: 60000 });

        let backend = ScriptedBackend::new().with_outcome(
            ComputationKind::Prediction,
            InvocationOutcome::Failure {
                stderr: "ModuleNotFoundError: sklearn".into(),
                exit_code: Some(1),
                cause: FailureCause::NonZeroExit,
            },
        );
        let err = service(backend).predict().await.unwrap_err();
        assert_eq!(err.kind(), "non_zero_exit");
    }

    #[tokio::test]
    async fn test_dashboard_live() {
        let json = r#"{"current_price": 8200.5, "price_change": -10.0, "price_change_percent": -0.12,
            "data_points": 900, "feature_count": 42, "date_range": {"start": "2021-01-04", "end": "2024-08-01"}}"#;
        let backend = ScriptedBackend::new().with_stdout(ComputationKind::DashboardData, json);
        let sourced = service(backend).dashboard_data().await;
        assert!(sourced.is_live());
        assert_eq!(sourced.data().feature_count, 42);
    }

    #[tokio::test]
    async fn test_dashboard_fallback_on_invalid_json() {
        let backend = ScriptedBackend::new().with_stdout(ComputationKind::DashboardData, "Traceback ...");
        let sourced = service(backend).dashboard_data().await;
        assert_eq!(sourced.source(), "fallback");
        assert_eq!(sourced.fallback_reason().map(|e| e.kind()), Some("malformed_output"));
        assert_eq!(sourced.into_data(), FallbackCatalog::default().dashboard);
    }

    #[tokio::test]
    async fn test_models_never_merge_sources() {
        let json = r#"{"lstm": {"accuracy": 0.61, "precision": 0.6, "recall": 0.61}}"#;
        let backend = ScriptedBackend::new().with_stdout(ComputationKind::ModelTraining, json);
        let metrics = service(backend).model_metrics().await.into_data();
        assert_eq!(metrics.keys().collect::<Vec<_>>(), vec!["lstm"]);

        let backend = ScriptedBackend::new()
            .with_outcome(ComputationKind::ModelTraining, InvocationOutcome::Timeout { timeout_ms: 120000 });
        let sourced = service(backend).model_metrics().await;
        assert_eq!(sourced.fallback_reason().map(|e| e.kind()), Some("timeout_exceeded"));
        assert_eq!(sourced.into_data(), FallbackCatalog::default().models);
    }

    #[test]
    fn test_computations_use_configured_interpreter() {
        let svc = service(ScriptedBackend::new());
        let predict = svc.computation(ComputationKind::Prediction);
        assert_eq!(predict.program, "python3");
        assert_eq!(predict.args, vec!["demo.py".to_string()]);

        let models = svc.computation(ComputationKind::ModelTraining);
        assert_eq!(models.args[0], "-c");
        assert!(models.args[1].contains("ModelTrainer"));
    }
}
