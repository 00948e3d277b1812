use crossbeam_channel::{Receiver, Sender, TrySendError};
use thiserror::Error;

use crate::order::SessionEvent;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("delivery channel is full")]
    ChannelFull,

    #[error("delivery channel is closed")]
    ChannelClosed,

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Downstream sink for session events. Delivery is fire-and-forget: the
/// dialogue machine logs failures and resets normally either way.
pub trait OrderNotifier: Send {
    fn notify(&mut self, event: &SessionEvent) -> Result<(), NotifyError>;
}

/// Serializes envelopes to JSON and hands them to a bounded channel. The
/// transport that drains the channel (HTTP, WebSocket, a log) is someone
/// else's problem; `try_send` keeps the processing flow from ever blocking
/// on a slow consumer.
pub struct ChannelNotifier {
    tx: Sender<String>,
}

impl ChannelNotifier {
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }

    pub fn bounded(capacity: usize) -> (Self, Receiver<String>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx }, rx)
    }
}

impl OrderNotifier for ChannelNotifier {
    fn notify(&mut self, event: &SessionEvent) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(event)?;
        match self.tx.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(NotifyError::ChannelFull),
            Err(TrySendError::Disconnected(_)) => Err(NotifyError::ChannelClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelopes_arrive_as_json() {
        let (mut notifier, rx) = ChannelNotifier::bounded(4);
        notifier.notify(&SessionEvent::Start).unwrap();
        assert_eq!(rx.try_recv().unwrap(), r#"{"type":"start"}"#);
    }

    #[test]
    fn full_channel_reports_without_blocking() {
        let (mut notifier, _rx) = ChannelNotifier::bounded(1);
        notifier.notify(&SessionEvent::Start).unwrap();
        let err = notifier.notify(&SessionEvent::Start);
        assert!(matches!(err, Err(NotifyError::ChannelFull)));
    }

    #[test]
    fn closed_channel_reports_without_blocking() {
        let (mut notifier, rx) = ChannelNotifier::bounded(1);
        drop(rx);
        let err = notifier.notify(&SessionEvent::Start);
        assert!(matches!(err, Err(NotifyError::ChannelClosed)));
    }
}
