//! Notifications for the rendering layer.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rust's ownership model makes traditional observer patterns tricky.
//! We use `tokio::sync::broadcast` for a safe, async-friendly event bus:
//! subscribers receive clones of each notification and a slow subscriber
//! never blocks the editor.

use tokio::sync::broadcast;

/// Something the rendering layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotification {
    /// The session state was replaced; re-render
    StateChanged,
    /// A compile output line arrived for the current compile
    CompileLine(String),
    /// The current compile ended
    CompileFinished { ok: bool },
    /// A liveness probe ended
    ConnectionChecked { connected: bool },
}

/// Event bus for broadcasting session notifications.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionNotification>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: SessionNotification) {
        // Ignore error if no receivers (not a problem)
        let _ = self.sender.send(event);
    }

    /// Subscribes to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotification> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for consuming notifications.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(editor.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let SessionNotification::CompileLine(line) = event {
///             println!("{line}");
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<SessionNotification>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<SessionNotification>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<SessionNotification> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<SessionNotification> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}
