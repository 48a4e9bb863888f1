use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::backend::ComputeBackend;
use super::outcome::{FailureCause, InvocationOutcome};
use super::programs::Computation;

/// Runs computations as child processes behind a bounded admission gate.
///
/// The timeout is a single deadline covering both the wait for a free slot and
/// the run itself, so a request never waits longer than its endpoint allows.
pub struct ProcessInvoker {
    gate: Semaphore,
    max_concurrent: usize,
}

impl ProcessInvoker {
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            gate: Semaphore::new(max_concurrent),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn available_slots(&self) -> usize {
        self.gate.available_permits()
    }
}

#[async_trait]
impl ComputeBackend for ProcessInvoker {
    async fn invoke(&self, computation: &Computation, timeout: Duration) -> InvocationOutcome {
        let invocation_id = Uuid::new_v4();
        let kind = computation.kind.as_str();
        let timeout_ms = timeout.as_millis() as u64;
        let started = Instant::now();
        let deadline = started + timeout;

        let _permit = match tokio::time::timeout_at(deadline, self.gate.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(e)) => {
                error!("❌ [{}] {} admission gate closed: {}", invocation_id, kind, e);
                return launch_failure(format!("admission gate closed: {}", e));
            }
            Err(_) => {
                warn!(
                    "⏳ [{}] {} waited {}ms for a compute slot ({} max), giving up",
                    invocation_id, kind, timeout_ms, self.max_concurrent
                );
                return InvocationOutcome::Timeout { timeout_ms };
            }
        };

        info!(
            "🚀 [{}] Running {} ({} {}), timeout {}ms",
            invocation_id,
            kind,
            computation.program,
            describe_args(&computation.args),
            timeout_ms
        );

        let outcome = run_child(computation, deadline, timeout_ms).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &outcome {
            InvocationOutcome::Success { stdout, .. } => info!(
                "✅ [{}] {} finished in {}ms ({} bytes of output)",
                invocation_id, kind, elapsed_ms, stdout.len()
            ),
            InvocationOutcome::Timeout { .. } => warn!(
                "⏱️ [{}] {} timed out after {}ms (timeout {}ms)",
                invocation_id, kind, elapsed_ms, timeout_ms
            ),
            InvocationOutcome::Failure { exit_code, cause, stderr } => error!(
                "❌ [{}] {} failed after {}ms ({:?}, exit {:?}): {}",
                invocation_id,
                kind,
                elapsed_ms,
                cause,
                exit_code,
                stderr.lines().last().unwrap_or("")
            ),
        }

        outcome
    }
}

async fn run_child(computation: &Computation, deadline: Instant, timeout_ms: u64) -> InvocationOutcome {
    let mut command = Command::new(&computation.program);
    command
        .args(&computation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &computation.workdir {
        command.current_dir(dir);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return launch_failure(format!("failed to start {}: {}", computation.program, e)),
    };

    let mut stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let mut stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    match tokio::time::timeout_at(deadline, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = collect(&mut stdout_task, deadline).await;
            let stderr = collect(&mut stderr_task, deadline).await;
            let (Some(stdout), Some(stderr)) = (stdout, stderr) else {
                // The child exited but something it spawned still holds a pipe open
                warn!(
                    "⚠️ {} exited ({}) but its output was still open at the deadline",
                    computation.kind.as_str(),
                    status
                );
                return InvocationOutcome::Timeout { timeout_ms };
            };
            match status.code() {
                Some(0) => InvocationOutcome::Success { stdout, stderr, exit_code: 0 },
                exit_code => InvocationOutcome::Failure {
                    stderr,
                    exit_code,
                    cause: FailureCause::NonZeroExit,
                },
            }
        }
        Ok(Err(e)) => {
            stdout_task.abort();
            stderr_task.abort();
            launch_failure(format!("failed to wait on {}: {}", computation.program, e))
        }
        Err(_) => {
            // kill() also reaps the child
            if let Err(e) = child.kill().await {
                warn!("⚠️ Failed to kill timed out {}: {}", computation.kind.as_str(), e);
            }
            stdout_task.abort();
            stderr_task.abort();
            InvocationOutcome::Timeout { timeout_ms }
        }
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        if let Err(e) = stream.read_to_end(&mut buf).await {
            debug!("Stream read ended early: {}", e);
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Waits for a stream reader until the deadline.
///
/// A grandchild can hold a pipe open after the child exits. `None` means the
/// stream was still open at the deadline and the reader was aborted.
async fn collect(task: &mut JoinHandle<String>, deadline: Instant) -> Option<String> {
    match tokio::time::timeout_at(deadline, &mut *task).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            warn!("⚠️ Output reader task failed: {}", e);
            Some(String::new())
        }
        Err(_) => {
            task.abort();
            None
        }
    }
}

fn launch_failure(reason: String) -> InvocationOutcome {
    InvocationOutcome::Failure {
        stderr: reason,
        exit_code: None,
        cause: FailureCause::Launch,
    }
}

fn describe_args(args: &[String]) -> String {
    match args {
        [flag, _source] if flag == "-c" => "-c <inline program>".to_string(),
        _ => args.join(" "),
    }
}
