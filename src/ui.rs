//! The UI-owning context.
//!
//! A single [`UiActor`] owns the current [`UiState`]. Every write goes through
//! its mailbox, so state transitions are applied one at a time and in the
//! order they were sent. Enqueued call callbacks are also run inside the
//! actor's message loop via the [`MainThread`] handle, which plays the role of
//! the platform main thread.

use crate::call::{CallbackExecutor, Task};
use crate::error::{RepoClientError, Result};
use crate::ui_state::UiState;
use ractor::concurrency::JoinHandle;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const STATE_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Actor holding the single `UiState`.
pub struct UiActor;

pub struct UiActorState {
    current: UiState,
    subscribers: Vec<mpsc::UnboundedSender<UiState>>,
    transitions: u64,
}

/// Messages the UI actor can handle
pub enum UiMessage {
    /// Replace the current state and notify subscribers
    SetState(UiState),
    /// Run a task on the UI context
    Run(Task),
    /// Receive the current state, then every later transition
    Subscribe(mpsc::UnboundedSender<UiState>),
    /// Read the current state
    GetState(RpcReplyPort<UiState>),
}

impl std::fmt::Debug for UiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiMessage::SetState(state) => f.debug_tuple("SetState").field(&state.name()).finish(),
            UiMessage::Run(_) => f.write_str("Run(..)"),
            UiMessage::Subscribe(_) => f.write_str("Subscribe(..)"),
            UiMessage::GetState(_) => f.write_str("GetState(..)"),
        }
    }
}

#[ractor::async_trait]
impl Actor for UiActor {
    type Msg = UiMessage;
    type State = UiActorState;
    type Arguments = ();

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        _args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        debug!("UI actor starting");
        Ok(UiActorState {
            current: UiState::Idle,
            subscribers: Vec::new(),
            transitions: 0,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        match message {
            UiMessage::SetState(next) => {
                debug!(from = state.current.name(), to = next.name(), "UI state transition");
                state.transitions += 1;
                state
                    .subscribers
                    .retain(|tx| tx.send(next.clone()).is_ok());
                state.current = next;
            }
            UiMessage::Run(task) => {
                task();
            }
            UiMessage::Subscribe(tx) => {
                if tx.send(state.current.clone()).is_ok() {
                    state.subscribers.push(tx);
                }
            }
            UiMessage::GetState(reply) => {
                if reply.send(state.current.clone()).is_err() {
                    warn!("State query caller went away before the reply");
                }
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        info!(transitions = state.transitions, final_state = state.current.name(), "UI actor stopped");
        Ok(())
    }
}

/// Handle to the UI-owning context.
#[derive(Debug, Clone)]
pub struct MainThread {
    actor: ActorRef<UiMessage>,
}

impl MainThread {
    /// Starts the UI actor in the `Idle` state.
    pub async fn spawn() -> Result<(Self, JoinHandle<()>)> {
        let (actor, handle) = Actor::spawn(None, UiActor, ())
            .await
            .map_err(|e| RepoClientError::UiClosed(format!("Failed to start UI actor: {}", e)))?;
        Ok((MainThread { actor }, handle))
    }

    /// Publishes a state. Dropped with a warning once the UI is gone.
    pub fn set_state(&self, state: UiState) {
        let name = state.name();
        if let Err(e) = self.actor.send_message(UiMessage::SetState(state)) {
            warn!(state = name, "Dropping UI state, UI actor is gone: {}", e);
        }
    }

    /// Runs `task` on the UI context.
    pub fn post(&self, task: Task) {
        if let Err(e) = self.actor.send_message(UiMessage::Run(task)) {
            warn!("Dropping UI task, UI actor is gone: {}", e);
        }
    }

    /// Streams the current state followed by every transition.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<UiState>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.actor
            .send_message(UiMessage::Subscribe(tx))
            .map_err(|e| RepoClientError::UiClosed(e.to_string()))?;
        Ok(rx)
    }

    pub async fn current_state(&self) -> Result<UiState> {
        let result = self
            .actor
            .call(|reply| UiMessage::GetState(reply), Some(STATE_QUERY_TIMEOUT))
            .await
            .map_err(|e| RepoClientError::UiClosed(e.to_string()))?;

        match result {
            ractor::rpc::CallResult::Success(state) => Ok(state),
            ractor::rpc::CallResult::Timeout => {
                Err(RepoClientError::UiClosed("Timeout reading UI state".to_string()))
            }
            ractor::rpc::CallResult::SenderError => {
                Err(RepoClientError::UiClosed("UI actor dropped the state query".to_string()))
            }
        }
    }

    pub fn stop(&self) {
        self.actor.stop(Some("UI destroyed".to_string()));
    }
}

impl CallbackExecutor for MainThread {
    fn execute(&self, task: Task) {
        self.post(task);
    }
}
