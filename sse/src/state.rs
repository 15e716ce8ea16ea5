use crate::connection::ConnectionId;
use log::*;
use tokio::sync::watch;

/// Lifecycle of one greeting stream.
///
/// ```text
/// Idle -> Running -> Cancelled
///              \---> Completed   (single-shot only)
/// Idle | Running -> Failed       (timer fault)
/// Idle -> Cancelled              (cancelled before the producer started)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Running,
    Cancelled,
    Completed,
    Failed,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamState::Cancelled | StreamState::Completed | StreamState::Failed
        )
    }

    pub fn can_transition_to(&self, next: StreamState) -> bool {
        use StreamState::*;
        matches!(
            (*self, next),
            (Idle, Running)
                | (Idle, Cancelled)
                | (Idle, Failed)
                | (Running, Cancelled)
                | (Running, Completed)
                | (Running, Failed)
        )
    }
}

/// Owns the state of one stream and publishes every change to the stream's
/// consumer handle.
pub(crate) struct Lifecycle {
    id: ConnectionId,
    tx: watch::Sender<StreamState>,
}

impl Lifecycle {
    pub(crate) fn new(id: ConnectionId) -> (Self, watch::Receiver<StreamState>) {
        let (tx, rx) = watch::channel(StreamState::Idle);
        (Self { id, tx }, rx)
    }

    /// Moves to `next` if the transition is legal. Returns whether it moved.
    pub(crate) fn transition(&self, next: StreamState) -> bool {
        let mut from = StreamState::Idle;
        let moved = self.tx.send_if_modified(|state| {
            from = *state;
            if state.can_transition_to(next) {
                *state = next;
                true
            } else {
                false
            }
        });

        if moved {
            trace!("Stream {}: {from:?} -> {next:?}", self.id.as_str());
        } else {
            debug!(
                "Stream {}: ignoring transition {from:?} -> {next:?}",
                self.id.as_str()
            );
        }
        moved
    }

    pub(crate) fn current(&self) -> StreamState {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [StreamState; 5] = [
        StreamState::Idle,
        StreamState::Running,
        StreamState::Cancelled,
        StreamState::Completed,
        StreamState::Failed,
    ];

    #[test]
    fn terminal_states_absorb_every_transition() {
        for terminal in ALL.iter().filter(|s| s.is_terminal()) {
            for next in ALL {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal:?} must not move to {next:?}"
                );
            }
        }
    }

    #[test]
    fn completed_is_only_reachable_from_running() {
        assert!(StreamState::Running.can_transition_to(StreamState::Completed));
        assert!(!StreamState::Idle.can_transition_to(StreamState::Completed));
    }

    #[test]
    fn running_never_goes_back_to_idle() {
        assert!(!StreamState::Running.can_transition_to(StreamState::Idle));
        assert!(!StreamState::Running.can_transition_to(StreamState::Running));
    }

    #[test]
    fn lifecycle_publishes_transitions_to_subscribers() {
        let (lifecycle, rx) = Lifecycle::new(ConnectionId::new());
        assert_eq!(*rx.borrow(), StreamState::Idle);

        assert!(lifecycle.transition(StreamState::Running));
        assert_eq!(*rx.borrow(), StreamState::Running);

        assert!(lifecycle.transition(StreamState::Cancelled));
        assert!(!lifecycle.transition(StreamState::Running));
        assert_eq!(lifecycle.current(), StreamState::Cancelled);
        assert_eq!(*rx.borrow(), StreamState::Cancelled);
    }

    #[test]
    fn lifecycle_keeps_working_without_subscribers() {
        let (lifecycle, rx) = Lifecycle::new(ConnectionId::new());
        drop(rx);
        assert!(lifecycle.transition(StreamState::Failed));
        assert_eq!(lifecycle.current(), StreamState::Failed);
    }
}
