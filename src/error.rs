use thiserror::Error;

/// Why a computation did not yield usable output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvocationError {
    #[error("Computation timed out after {timeout_ms}ms")]
    TimeoutExceeded { timeout_ms: u64 },

    #[error("Computation exited with status {}", describe_exit(.exit_code))]
    NonZeroExit { exit_code: Option<i32>, stderr: String },

    #[error("Malformed computation output: {reason}")]
    MalformedOutput { reason: String },

    #[error("Failed to launch computation: {reason}")]
    LaunchError { reason: String },
}

impl InvocationError {
    /// Stable short name, used in logs and the `x-fallback-reason` header.
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::TimeoutExceeded { .. } => "timeout_exceeded",
            InvocationError::NonZeroExit { .. } => "non_zero_exit",
            InvocationError::MalformedOutput { .. } => "malformed_output",
            InvocationError::LaunchError { .. } => "launch_error",
        }
    }
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = InvocationError::NonZeroExit { exit_code: Some(1), stderr: "boom".into() };
        assert_eq!(err.to_string(), "Computation exited with status 1");
        assert_eq!(err.kind(), "non_zero_exit");

        let err = InvocationError::NonZeroExit { exit_code: None, stderr: String::new() };
        assert_eq!(err.to_string(), "Computation exited with status unknown");

        let err = InvocationError::TimeoutExceeded { timeout_ms: 30000 };
        assert_eq!(err.to_string(), "Computation timed out after 30000ms");
    }
}
