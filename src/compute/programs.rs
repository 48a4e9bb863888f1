use std::path::{Path, PathBuf};

/// Which external computation an invocation runs. Each kind has its own timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputationKind {
    Prediction,
    DashboardData,
    ModelTraining,
}

impl ComputationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputationKind::Prediction => "prediction",
            ComputationKind::DashboardData => "dashboard_data",
            ComputationKind::ModelTraining => "model_training",
        }
    }
}

/// A command line for one external computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub kind: ComputationKind,
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
}

impl Computation {
    /// `<interpreter> <script>`
    pub fn script(kind: ComputationKind, interpreter: &str, script: &Path) -> Self {
        Self {
            kind,
            program: interpreter.to_string(),
            args: vec![script.display().to_string()],
            workdir: None,
        }
    }

    /// `<interpreter> -c <source>`
    pub fn inline(kind: ComputationKind, interpreter: &str, source: &str) -> Self {
        Self {
            kind,
            program: interpreter.to_string(),
            args: vec!["-c".to_string(), source.to_string()],
            workdir: None,
        }
    }

    pub fn in_dir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }
}

/// Collects the latest FTSE 100 data and prints a one-line dashboard snapshot.
pub const DASHBOARD_PROGRAM: &str = r#"
import sys
import json
sys.path.append('.')
from data_collector import FTSE100DataCollector
from feature_engineering import FeatureEngineer

collector = FTSE100DataCollector()
data = collector.fetch_data()

engineer = FeatureEngineer()
features = engineer.create_all_features(data)

close = data['Close']
print(json.dumps({
    "current_price": float(close.iloc[-1]),
    "price_change": float(close.iloc[-1] - close.iloc[-2]),
    "price_change_percent": float((close.iloc[-1] - close.iloc[-2]) / close.iloc[-2] * 100),
    "data_points": len(data),
    "feature_count": len(features.columns),
    "date_range": {
        "start": data.index[0].strftime("%Y-%m-%d"),
        "end": data.index[-1].strftime("%Y-%m-%d")
    }
}))
"#;

/// Trains every model and prints `{name: {accuracy, precision, recall}}`.
pub const MODELS_PROGRAM: &str = r#"
import sys
import json
sys.path.append('.')
from model_trainer import ModelTrainer
from data_collector import FTSE100DataCollector
from feature_engineering import FeatureEngineer

collector = FTSE100DataCollector()
data = collector.fetch_data()
engineer = FeatureEngineer()
features = engineer.create_all_features(data)

trainer = ModelTrainer()
X_train, X_test, y_train, y_test = trainer.prepare_data(features)
results = trainer.train_models(X_train, X_test, y_train, y_test)

print(json.dumps(results))
"#;
