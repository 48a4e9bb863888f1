use crate::error::InvocationError;

/// What caused a `Failure` outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The process ran and reported failure (nonzero exit or killed by a signal).
    NonZeroExit,
    /// The process could not be started or waited on.
    Launch,
}

/// Classified result of a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    Success {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    Timeout {
        timeout_ms: u64,
    },
    Failure {
        stderr: String,
        exit_code: Option<i32>,
        cause: FailureCause,
    },
}

impl InvocationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            InvocationOutcome::Success { .. } => "success",
            InvocationOutcome::Timeout { .. } => "timeout",
            InvocationOutcome::Failure { .. } => "failure",
        }
    }

    /// Stdout of a successful run, or the error describing why there is none.
    pub fn into_stdout(self) -> Result<String, InvocationError> {
        match self {
            InvocationOutcome::Success { stdout, .. } => Ok(stdout),
            InvocationOutcome::Timeout { timeout_ms } => {
                Err(InvocationError::TimeoutExceeded { timeout_ms })
            }
            InvocationOutcome::Failure { stderr, exit_code, cause: FailureCause::NonZeroExit } => {
                Err(InvocationError::NonZeroExit { exit_code, stderr })
            }
            InvocationOutcome::Failure { stderr, cause: FailureCause::Launch, .. } => {
                Err(InvocationError::LaunchError { reason: stderr })
            }
        }
    }
}
