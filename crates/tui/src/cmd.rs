//! # Command Execution Layer
//!
//! Translates [`Effect`]s produced by pure state updates into imperative
//! [`Cmd`]s and executes them. This is the boundary where the app touches
//! the network and the preference file.
//!
//! - [`from_effects`] maps effects to commands.
//! - [`run_cmds`] executes commands: quick local work completes immediately,
//!   REST calls are spawned and returned as [`PendingExec`]s.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tokio::task::{JoinError, JoinHandle, spawn};
use tracing::{debug, warn};
use uploadvalidator_api::ProjectConfigApi;
use uploadvalidator_engine::{LoadRequest, SaveRequest, execute_load, execute_save};
use uploadvalidator_types::{ConfigInput, Effect, ExecOutcome};
use uploadvalidator_util::UserPreferences;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// `GET /projects/{repo}/config`
    FetchConfig { generation: u64, repo: String },
    /// `PUT /projects/{repo}/config`
    StoreConfig {
        generation: u64,
        repo: String,
        input: ConfigInput,
    },
    /// Record the repository in the preference file.
    RememberRepository(String),
}

/// Outcomes of a command run: finished results and still-running tasks.
#[derive(Debug, Default)]
pub struct CommandBatch {
    pub immediate: Vec<ExecOutcome>,
    pub pending: Vec<PendingExec>,
}

/// Which panel completion a spawned request reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Load,
    Save,
}

/// A spawned REST call that resolves to the outcome of its request.
///
/// A task that panics or is cancelled still resolves to a failed
/// `ConfigLoaded`/`ConfigSaved` for its generation, so the panel never stays
/// stuck in `Loading` or `Saving`.
#[derive(Debug)]
pub struct PendingExec {
    kind: RequestKind,
    generation: u64,
    handle: JoinHandle<ExecOutcome>,
}

impl PendingExec {
    fn spawn<F>(kind: RequestKind, generation: u64, task: F) -> Self
    where
        F: Future<Output = ExecOutcome> + Send + 'static,
    {
        Self {
            kind,
            generation,
            handle: spawn(task),
        }
    }

    fn join_failed(&self, error: JoinError) -> ExecOutcome {
        warn!(kind = ?self.kind, generation = self.generation, %error, "request task failed");
        let message = format!("Request task failed: {error}");
        match self.kind {
            RequestKind::Load => ExecOutcome::ConfigLoaded {
                generation: self.generation,
                result: Err(message),
            },
            RequestKind::Save => ExecOutcome::ConfigSaved {
                generation: self.generation,
                result: Err(message),
            },
        }
    }
}

impl Future for PendingExec {
    type Output = ExecOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ExecOutcome> {
        let this = self.get_mut();
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(error)) => Poll::Ready(this.join_failed(error)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Shared handles commands need to run.
#[derive(Clone)]
pub struct CommandContext {
    pub api: Arc<dyn ProjectConfigApi>,
    pub preferences: Arc<UserPreferences>,
}

/// Convert application [`Effect`]s into [`Cmd`]s.
///
/// `Effect::Quit` is handled by the runtime and produces no command.
pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::LoadConfigRequested { generation, repo } => Some(Cmd::FetchConfig { generation, repo }),
            Effect::SaveConfigRequested { generation, repo, input } => Some(Cmd::StoreConfig {
                generation,
                repo,
                input,
            }),
            Effect::RememberRepository(repo) => Some(Cmd::RememberRepository(repo)),
            Effect::Quit => None,
        })
        .collect()
}

/// Execute commands, spawning REST calls onto the runtime.
pub fn run_cmds(context: &CommandContext, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        debug!(?command, "executing command");
        match command {
            Cmd::FetchConfig { generation, repo } => {
                let api = Arc::clone(&context.api);
                batch.pending.push(PendingExec::spawn(RequestKind::Load, generation, async move {
                    let request = LoadRequest { generation, repo };
                    let result = execute_load(api.as_ref(), &request).await;
                    ExecOutcome::ConfigLoaded { generation, result }
                }));
            }
            Cmd::StoreConfig { generation, repo, input } => {
                let api = Arc::clone(&context.api);
                batch.pending.push(PendingExec::spawn(RequestKind::Save, generation, async move {
                    let request = SaveRequest { generation, repo, input };
                    let result = execute_save(api.as_ref(), &request).await;
                    ExecOutcome::ConfigSaved { generation, result }
                }));
            }
            Cmd::RememberRepository(repo) => {
                if let Err(error) = context.preferences.set_last_repository(Some(repo.clone())) {
                    warn!(%error, "failed to persist last repository");
                    batch
                        .immediate
                        .push(ExecOutcome::Log(format!("Could not remember '{repo}': {error}")));
                }
            }
        }
    }
    batch
}

/// Convenience used by the runtime: effects straight to a batch.
pub fn run_from_effects(context: &CommandContext, effects: Vec<Effect>) -> CommandBatch {
    run_cmds(context, from_effects(effects))
}
