use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::analytics::FallbackCatalog;
use crate::compute::ComputationKind;
use crate::prediction::OutputFormat;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub compute: ComputeConfig,
    pub fallback: FallbackCatalog,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Send `x-data-source` / `x-fallback-reason` headers on the data endpoints.
    pub expose_data_source: bool,
}

#[derive(Debug, Clone)]
pub struct ComputeConfig {
    pub python_bin: String,
    pub predict_script: PathBuf,
    pub workdir: PathBuf,
    pub predict_timeout_secs: u64,
    pub dashboard_timeout_secs: u64,
    pub models_timeout_secs: u64,
    pub max_concurrent: usize,
    pub output_format: OutputFormat,
    pub simulation_mode: bool,
}

impl ComputeConfig {
    pub fn timeout_for(&self, kind: ComputationKind) -> Duration {
        let secs = match kind {
            ComputationKind::Prediction => self.predict_timeout_secs,
            ComputationKind::DashboardData => self.dashboard_timeout_secs,
            ComputationKind::ModelTraining => self.models_timeout_secs,
        };
        Duration::from_secs(secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("."),
            expose_data_source: true,
        }
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            python_bin: "python3".to_string(),
            predict_script: PathBuf::from("demo.py"),
            workdir: PathBuf::from("."),
            predict_timeout_secs: 60,
            dashboard_timeout_secs: 30,
            models_timeout_secs: 120,
            max_concurrent: 4,
            output_format: OutputFormat::Auto,
            simulation_mode: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let server = ServerConfig {
            host: env::var("API_HOST").unwrap_or(defaults.server.host),
            port: parse_env("API_PORT", defaults.server.port),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.server.static_dir),
            expose_data_source: parse_env("EXPOSE_DATA_SOURCE", defaults.server.expose_data_source),
        };

        let output_format = match env::var("PREDICTION_OUTPUT_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.compute.output_format,
        };

        let compute = ComputeConfig {
            python_bin: env::var("PYTHON_BIN").unwrap_or(defaults.compute.python_bin),
            predict_script: env::var("PREDICT_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.compute.predict_script),
            workdir: env::var("COMPUTE_WORKDIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.compute.workdir),
            predict_timeout_secs: positive_env("PREDICT_TIMEOUT_SECS", defaults.compute.predict_timeout_secs)?,
            dashboard_timeout_secs: positive_env("DASHBOARD_TIMEOUT_SECS", defaults.compute.dashboard_timeout_secs)?,
            models_timeout_secs: positive_env("MODELS_TIMEOUT_SECS", defaults.compute.models_timeout_secs)?,
            max_concurrent: positive_env("MAX_CONCURRENT_COMPUTATIONS", defaults.compute.max_concurrent as u64)?
                as usize,
            output_format,
            simulation_mode: parse_env("SIMULATION_MODE", defaults.compute.simulation_mode),
        };

        Ok(Config {
            server,
            compute,
            fallback: defaults.fallback,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn positive_env(key: &str, default: u64) -> anyhow::Result<u64> {
    let value = parse_env(key, default);
    if value == 0 {
        anyhow::bail!("{} must be greater than zero", key);
    }
    Ok(value)
}
