//! Host that pretends every announcement takes a while to show.
use battle_core::{BattleEvent, BattleHost, EventLog};
use tracing::debug;

/// Records events and stays busy for a fixed number of ticks after each one.
#[derive(Debug, Default)]
pub struct AnimatedHost {
    busy_ticks: u32,
    remaining: u32,
    pub log: EventLog,
}

impl AnimatedHost {
    pub fn new(busy_ticks: u32) -> Self {
        Self {
            busy_ticks,
            ..Self::default()
        }
    }

    /// One frame of animation time passes.
    pub fn advance(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

impl BattleHost for AnimatedHost {
    fn is_busy(&self) -> bool {
        self.remaining > 0
    }

    fn publish(&mut self, event: BattleEvent) {
        debug!(?event, "published");
        self.remaining = self.busy_ticks;
        self.log.push(event);
    }
}
