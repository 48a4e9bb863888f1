use async_trait::async_trait;
use std::time::Duration;

use super::outcome::InvocationOutcome;
use super::programs::Computation;

#[async_trait]
pub trait ComputeBackend: Send + Sync {
    /// Run a computation to completion or until `timeout` elapses.
    ///
    /// Never errors: launch problems are reported as `InvocationOutcome::Failure`.
    async fn invoke(&self, computation: &Computation, timeout: Duration) -> InvocationOutcome;
}
