//! Change notifications emitted by the profile registry.
//!
//! Listeners subscribe and receive a channel; delivery is fire-and-forget.
//! Receivers that have been dropped are pruned on the next emit. No ordering
//! between different listeners is guaranteed.

use std::sync::mpsc::{Receiver, Sender, channel};

/// Something changed in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    Added(String),
    Removed(String),
    Changed(String),
    FavoriteStatusChanged { key: String, favorite: bool },
}

/// Fan-out of [`ProfileEvent`]s to subscribed listeners
#[derive(Debug, Default)]
pub struct EventBus {
    listeners: Vec<Sender<ProfileEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&mut self) -> Receiver<ProfileEvent> {
        let (tx, rx) = channel();
        self.listeners.push(tx);
        rx
    }

    /// Deliver `event` to every live listener
    pub fn emit(&mut self, event: ProfileEvent) {
        log::trace!("Profile event: {:?}", event);
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
