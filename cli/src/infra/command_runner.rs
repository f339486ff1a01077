//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Captured runs are bounded by a timeout and
//! kill the child when it fires; streamed runs are not bounded and outlive
//! Ctrl-C until the child has exited.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;
use crate::domain::Invocation;

/// Default timeout for short captured probes (`terraform version`).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `CommandRunner`.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires: the future is dropped but the
/// OS process keeps running. This implementation uses `tokio::select!` with
/// explicit `child.kill()` to guarantee the process is terminated.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

/// `tokio::process::Command` for `inv`: program, args, working directory and
/// extra environment. The parent's own working directory is untouched.
fn command(inv: &Invocation) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(&inv.program);
    cmd.args(&inv.args)
        .current_dir(&inv.cwd)
        .envs(inv.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    cmd
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<Output> {
        self.run_with_timeout(invocation, self.timeout).await
    }

    async fn run_with_timeout(&self, invocation: &Invocation, timeout: Duration) -> Result<Output> {
        let program = &invocation.program;
        let mut child = command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }

    async fn run_status(&self, invocation: &Invocation) -> Result<ExitStatus> {
        let program = &invocation.program;
        // Listen before spawning: from here on SIGINT no longer terminates
        // tfctl, so the child always finishes its own shutdown first.
        let mut interrupts = Interrupts::listen()?;
        // Inherited stdio: Terraform's prompts and plan output reach the
        // terminal directly, and Ctrl-C reaches the child through the shared
        // process group.
        let mut child = command(invocation)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        loop {
            tokio::select! {
                status = child.wait() => {
                    return status.with_context(|| format!("waiting for {program}"));
                }
                () = interrupts.recv() => {
                    tracing::warn!(%program, "interrupt received, waiting for terraform to exit");
                }
            }
        }
    }
}

/// SIGINT listener for the lifetime of a streamed run.
#[cfg(unix)]
struct Interrupts(tokio::signal::unix::Signal);

#[cfg(unix)]
impl Interrupts {
    fn listen() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        let sig = signal(SignalKind::interrupt()).context("cannot listen for SIGINT")?;
        Ok(Self(sig))
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct Interrupts;

#[cfg(not(unix))]
impl Interrupts {
    #[allow(clippy::unnecessary_wraps)]
    fn listen() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
