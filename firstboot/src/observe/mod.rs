//! Status observer: the contract the core uses to push UI-facing status
//! without depending on any UI.

use crate::core::StatusUpdate;
use crate::errors::CatalogError;
use tokio::sync::mpsc;
use tracing::info;

/// Receives the displayed task list and per-task status transitions.
///
/// Called from the runner's worker context; implementations own any
/// marshaling to a presentation thread.
pub trait StatusObserver: Send + Sync {
    /// Replaces the displayed task list, in catalog order.
    fn update_list(&self, names: &[String]);

    /// Pushes one task's status transition.
    fn set_status(&self, update: StatusUpdate);
}

/// Builds the degraded single-row list shown when a catalog cannot be read.
#[must_use]
pub fn degraded_list(err: &CatalogError) -> Vec<String> {
    vec![format!("catalog unavailable: {err}")]
}

/// An observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl StatusObserver for NoOpObserver {
    fn update_list(&self, _names: &[String]) {}

    fn set_status(&self, _update: StatusUpdate) {}
}

/// An observer that logs through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl StatusObserver for LoggingObserver {
    fn update_list(&self, names: &[String]) {
        info!(tasks = names.len(), "task list updated");
    }

    fn set_status(&self, update: StatusUpdate) {
        info!(
            task = %update.task_name,
            index = update.index,
            state = %update.state,
            "task status"
        );
    }
}

/// A message forwarded to the presentation side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverMessage {
    /// The displayed list was replaced.
    ListReplaced(Vec<String>),
    /// One task changed state.
    StatusChanged(StatusUpdate),
}

/// Forwards observer calls as value messages over a channel, decoupling the
/// runner from any UI-thread affinity. The channel is unbounded so status
/// pushes never block the worker.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ObserverMessage>,
}

impl ChannelObserver {
    /// Creates the observer and the receiving end for the presentation side.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ObserverMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StatusObserver for ChannelObserver {
    fn update_list(&self, names: &[String]) {
        // A closed presentation side must never fail the runner.
        let _ = self.tx.send(ObserverMessage::ListReplaced(names.to_vec()));
    }

    fn set_status(&self, update: StatusUpdate) {
        let _ = self.tx.send(ObserverMessage::StatusChanged(update));
    }
}

/// A collecting observer for tests.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    lists: parking_lot::RwLock<Vec<Vec<String>>>,
    updates: parking_lot::RwLock<Vec<StatusUpdate>>,
}

impl CollectingObserver {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every list replacement seen, in order.
    #[must_use]
    pub fn lists(&self) -> Vec<Vec<String>> {
        self.lists.read().clone()
    }

    /// The most recent displayed list.
    #[must_use]
    pub fn last_list(&self) -> Option<Vec<String>> {
        self.lists.read().last().cloned()
    }

    /// Every status update seen, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.read().clone()
    }

    /// Status updates for one list index.
    #[must_use]
    pub fn updates_for(&self, index: usize) -> Vec<StatusUpdate> {
        self.updates
            .read()
            .iter()
            .filter(|u| u.index == index)
            .cloned()
            .collect()
    }
}

impl StatusObserver for CollectingObserver {
    fn update_list(&self, names: &[String]) {
        self.lists.write().push(names.to_vec());
    }

    fn set_status(&self, update: StatusUpdate) {
        self.updates.write().push(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskState;

    #[test]
    fn test_channel_observer_forwards_messages() {
        let (observer, mut rx) = ChannelObserver::new();
        observer.update_list(&["A".to_string(), "B".to_string()]);
        observer.set_status(StatusUpdate::new("A", 0, TaskState::Pending));

        assert_eq!(
            rx.try_recv().unwrap(),
            ObserverMessage::ListReplaced(vec!["A".to_string(), "B".to_string()])
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            ObserverMessage::StatusChanged(u) if u.index == 0
        ));
    }

    #[test]
    fn test_channel_observer_tolerates_closed_receiver() {
        let (observer, rx) = ChannelObserver::new();
        drop(rx);
        // Must not panic.
        observer.set_status(StatusUpdate::new("A", 0, TaskState::Success));
    }

    #[test]
    fn test_collecting_observer_records_in_order() {
        let observer = CollectingObserver::new();
        observer.set_status(StatusUpdate::new("A", 0, TaskState::Pending));
        observer.set_status(StatusUpdate::new("A", 0, TaskState::Success));

        let updates = observer.updates_for(0);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].state, TaskState::Success);
    }

    #[test]
    fn test_degraded_list_single_row() {
        let err = CatalogError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let list = degraded_list(&err);
        assert_eq!(list.len(), 1);
        assert!(list[0].starts_with("catalog unavailable"));
    }
}
