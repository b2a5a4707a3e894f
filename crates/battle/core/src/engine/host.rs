use crate::event::{BattleEvent, EventLog};

/// Presentation-side collaborator polled by the session.
///
/// The session only advances while [`is_busy`](BattleHost::is_busy) is false;
/// that is the sole suspension point of the battle.
pub trait BattleHost {
    /// Message box open, animation or movement in flight.
    fn is_busy(&self) -> bool;

    /// A scripted battle event is running; the session waits for it.
    fn is_event_running(&self) -> bool {
        false
    }

    /// Write-only announcement hook.
    fn publish(&mut self, event: BattleEvent);
}

bitflags::bitflags! {
    /// Sources of presentation busyness aggregated into one predicate.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BusyFlags: u8 {
        const MESSAGE = 1 << 0;
        const ANIMATION = 1 << 1;
        const MOVEMENT = 1 << 2;
    }
}

/// Host that records every event and is busy only when told to be.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    pub busy: BusyFlags,
    pub event_running: bool,
    pub log: EventLog,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.log.events()
    }
}

impl BattleHost for RecordingHost {
    fn is_busy(&self) -> bool {
        !self.busy.is_empty()
    }

    fn is_event_running(&self) -> bool {
        self.event_running
    }

    fn publish(&mut self, event: BattleEvent) {
        self.log.push(event);
    }
}
