use crate::error::AppError;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Kiosk process lifecycle. Dialogue state lives in the dialogue machine;
/// this only tracks whether the pipeline as a whole is up.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeState {
    Initializing,
    Running,
    Stopping,
    Stopped,
}

pub struct StateManager {
    state: Arc<RwLock<RuntimeState>>,
    state_tx: Sender<RuntimeState>,
    state_rx: Receiver<RuntimeState>,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        let (state_tx, state_rx) = crossbeam_channel::unbounded();
        Self {
            state: Arc::new(RwLock::new(RuntimeState::Initializing)),
            state_tx,
            state_rx,
        }
    }

    pub fn transition(&self, new_state: RuntimeState) -> Result<(), AppError> {
        let mut current = self.state.write();

        let valid = matches!(
            (&*current, &new_state),
            (RuntimeState::Initializing, RuntimeState::Running)
                | (RuntimeState::Initializing, RuntimeState::Stopping)
                | (RuntimeState::Running, RuntimeState::Stopping)
                | (RuntimeState::Stopping, RuntimeState::Stopped)
        );

        if !valid {
            return Err(AppError::Fatal(format!(
                "Invalid state transition: {:?} -> {:?}",
                *current, new_state
            )));
        }

        tracing::info!("State transition: {:?} -> {:?}", *current, new_state);
        *current = new_state.clone();
        let _ = self.state_tx.send(new_state);
        Ok(())
    }

    pub fn current(&self) -> RuntimeState {
        self.state.read().clone()
    }

    pub fn subscribe(&self) -> Receiver<RuntimeState> {
        self.state_rx.clone()
    }
}
