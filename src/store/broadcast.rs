//! BroadcastChangeSource — change notifications from a tokio broadcast channel.
//!
//! Each subscription spawns a listener task that awaits the next message and
//! forwards it to the callback. Cancelling the subscription aborts the task.

use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::reactive::ChangeEvent;

use super::traits::{ChangeListener, ChangeSource, Unsubscribe};

pub struct BroadcastChangeSource {
    sender: broadcast::Sender<ChangeEvent>,
    handle: Handle,
}

impl BroadcastChangeSource {
    /// Listener tasks are spawned on `handle`.
    pub fn new(sender: broadcast::Sender<ChangeEvent>, handle: Handle) -> Self {
        Self { sender, handle }
    }

    /// Use the runtime of the calling context. Returns `None` outside a runtime.
    pub fn from_current(sender: broadcast::Sender<ChangeEvent>) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|handle| Self::new(sender, handle))
    }

    pub fn sender(&self) -> &broadcast::Sender<ChangeEvent> {
        &self.sender
    }
}

impl ChangeSource for BroadcastChangeSource {
    fn subscribe(&self, listener: ChangeListener) -> Unsubscribe {
        let mut rx = self.sender.subscribe();
        let task = self.handle.spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => listener(&event),
                    // Dropped notifications still mean the data moved.
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "change listener lagged");
                        listener(&ChangeEvent::Lagged { skipped });
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let abort = task.abort_handle();
        Box::new(move || abort.abort())
    }
}
