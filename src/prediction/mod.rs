pub mod parser;
pub mod structured;
pub mod types;

pub use parser::parse_transcript;
pub use structured::parse_record;
pub use types::{Direction, PredictionResult, Probabilities};

/// How the prediction script's stdout is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON record if one is present, otherwise the log heuristics.
    Auto,
    /// JSON record only; baseline when absent.
    Structured,
    /// Log heuristics only.
    Heuristic,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(OutputFormat::Auto),
            "structured" | "json" => Ok(OutputFormat::Structured),
            "heuristic" | "text" => Ok(OutputFormat::Heuristic),
            _ => anyhow::bail!(
                "Invalid PREDICTION_OUTPUT_FORMAT: {}. Must be 'auto', 'structured' or 'heuristic'",
                s
            ),
        }
    }
}

/// Turns prediction stdout into a fully populated `PredictionResult`. Never fails.
pub trait OutputParser: Send + Sync {
    fn parse(&self, stdout: &str) -> PredictionResult;
}

pub struct PredictionParser {
    format: OutputFormat,
}

impl PredictionParser {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl OutputParser for PredictionParser {
    fn parse(&self, stdout: &str) -> PredictionResult {
        match self.format {
            OutputFormat::Auto => parse_record(stdout).unwrap_or_else(|| parse_transcript(stdout)),
            OutputFormat::Structured => {
                parse_record(stdout).unwrap_or_else(PredictionResult::baseline)
            }
            OutputFormat::Heuristic => parse_transcript(stdout),
        }
    }
}
