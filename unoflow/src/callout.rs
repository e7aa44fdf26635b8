//! The UNO call-out countdown.
//!
//! A player who plays down to a single card must call UNO within a fixed
//! window. While the window is open no other move is accepted. The countdown
//! is a plain value held by the session: it is started, inspected,
//! acknowledged, expired and cancelled explicitly, and the owner decides when
//! to look at the clock.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::constants::MAX_WAIT;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallOutId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOut {
    id: CallOutId,
    target: String,
    deadline: Instant,
    acknowledged: bool,
    resolved_next: String,
}

impl CallOut {
    pub fn id(&self) -> CallOutId {
        self.id
    }

    /// Player who has to call UNO.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Player whose turn starts once this call-out resolves.
    pub fn resolved_next(&self) -> &str {
        &self.resolved_next
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// How a call-out ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutResolution {
    pub target: String,
    pub next_player: String,
    /// Whether the target had to draw for missing the deadline.
    pub penalized: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Called in time, the call-out is resolved and handed back.
    Accepted(CallOut),
    /// The deadline already passed, the call-out stays in the slot for expiry.
    Late,
    NoCallOut,
}

/// Holds at most one call-out.
#[derive(Debug, Default)]
pub struct CallOutSlot {
    active: Option<CallOut>,
    issued: u64,
}

impl CallOutSlot {
    /// Cancels whatever is running and starts a fresh countdown. Windows
    /// longer than an hour are cut to an hour.
    pub fn start(
        &mut self,
        target: String,
        resolved_next: String,
        window: Duration,
        now: Instant,
    ) -> &CallOut {
        if let Some(previous) = self.cancel() {
            debug!(player = %previous.target, "Superseded pending call-out");
        }

        self.issued += 1;
        self.active.insert(CallOut {
            id: CallOutId(self.issued),
            target,
            deadline: now + window.min(MAX_WAIT),
            acknowledged: false,
            resolved_next,
        })
    }

    /// Discards the running call-out without resolving it. Safe to call on an
    /// empty slot.
    pub fn cancel(&mut self) -> Option<CallOut> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&CallOut> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_current(&self, id: CallOutId) -> bool {
        self.active.as_ref().map(|call_out| call_out.id) == Some(id)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(|call_out| call_out.deadline)
    }

    pub fn acknowledge(&mut self, now: Instant) -> Acknowledgement {
        let Some(call_out) = self.active.as_mut() else {
            return Acknowledgement::NoCallOut;
        };
        if call_out.is_due(now) {
            return Acknowledgement::Late;
        }
        call_out.acknowledged = true;

        self.active
            .take()
            .map(Acknowledgement::Accepted)
            .unwrap_or(Acknowledgement::NoCallOut)
    }

    /// Whether the running call-out's window has closed unacknowledged.
    pub fn is_due(&self, now: Instant) -> bool {
        self.active
            .as_ref()
            .map(|call_out| !call_out.acknowledged && call_out.is_due(now))
            .unwrap_or(false)
    }

    /// Removes the call-out once its penalty has been applied.
    pub(crate) fn finish(&mut self, id: CallOutId) -> Option<CallOut> {
        if self.is_current(id) {
            self.active.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(10);

    #[test]
    fn starting_twice_keeps_only_the_second() {
        let now = Instant::now();
        let mut slot = CallOutSlot::default();

        let first = slot.start("A".into(), "B".into(), WINDOW, now).id();
        let second = slot
            .start("C".into(), "D".into(), WINDOW, now + Duration::from_secs(3))
            .id();

        assert_ne!(first, second);
        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
        assert_eq!(slot.active().map(|c| c.target()), Some("C"));
        assert_eq!(slot.finish(first), None);
        assert!(slot.is_active());
    }

    #[test]
    fn cancel_on_empty_slot_is_harmless() {
        let mut slot = CallOutSlot::default();
        assert_eq!(slot.cancel(), None);
        assert_eq!(slot.cancel(), None);
        assert!(!slot.is_active());
    }

    #[test]
    fn acknowledge_before_deadline_resolves() {
        let now = Instant::now();
        let mut slot = CallOutSlot::default();
        slot.start("A".into(), "B".into(), WINDOW, now);

        let acknowledged = slot.acknowledge(now + Duration::from_secs(9));
        let Acknowledgement::Accepted(call_out) = acknowledged else {
            panic!("Expected the call-out to be accepted.");
        };

        assert!(call_out.acknowledged());
        assert_eq!(call_out.resolved_next(), "B");
        assert!(!slot.is_active());
    }

    #[test]
    fn acknowledge_after_deadline_is_late() {
        let now = Instant::now();
        let mut slot = CallOutSlot::default();
        slot.start("A".into(), "B".into(), WINDOW, now);

        assert_eq!(slot.acknowledge(now + WINDOW), Acknowledgement::Late);
        assert!(slot.is_due(now + WINDOW));
        assert!(slot.is_active());
    }

    #[test]
    fn acknowledge_without_call_out() {
        let mut slot = CallOutSlot::default();
        assert_eq!(slot.acknowledge(Instant::now()), Acknowledgement::NoCallOut);
    }

    #[test]
    fn remaining_counts_down() {
        let now = Instant::now();
        let mut slot = CallOutSlot::default();
        let call_out = slot.start("A".into(), "B".into(), WINDOW, now).clone();

        assert_eq!(call_out.remaining(now + Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(call_out.remaining(now + Duration::from_secs(40)), Duration::ZERO);
        assert!(!slot.is_due(now + Duration::from_secs(4)));
    }

    #[test]
    fn oversized_window_is_cut_to_an_hour() {
        let now = Instant::now();
        let mut slot = CallOutSlot::default();

        let call_out = slot.start("A".into(), "B".into(), Duration::MAX, now).clone();

        assert_eq!(call_out.deadline(), now + MAX_WAIT);
        assert_eq!(call_out.remaining(now), MAX_WAIT);
    }
}
