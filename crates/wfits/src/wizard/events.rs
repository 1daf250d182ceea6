//! Wizard event broadcaster for observers of navigation.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use super::controller::RefusalReason;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardEvent {
    StepChanged { from: usize, to: usize },
    NavigationRefused { step: usize, reason: RefusalReason },
    Completed { total_steps: usize },
    /// The flow restarted at `step` after completing.
    Restarted { step: usize },
}

/// Broadcasts wizard events to any number of subscribers.
#[derive(Clone)]
pub struct WizardEvents {
    sender: Arc<broadcast::Sender<WizardEvent>>,
}

impl WizardEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn send(&self, event: WizardEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.sender.subscribe()
    }
}

impl Default for WizardEvents {
    fn default() -> Self {
        Self::new(32)
    }
}
