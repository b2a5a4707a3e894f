//! Structured announcements published to the presentation host.
//!
//! Events are write-only from the session's perspective. They carry enough
//! data to render the battle log and to fingerprint a replay.

use crate::action::{ActionError, ActionItem, ActionResult};
use crate::engine::{BattleOutcome, Phase, Rewards};
use crate::state::{BattlerId, EventId, StatusKind};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    /// One per distinct visible enemy name at battle start.
    Emerged {
        name: String,
    },
    Preemptive,
    Surprise,
    TurnStarted {
        turn: u32,
    },
    ActionStarted {
        subject: BattlerId,
        item: ActionItem,
        targets: Vec<BattlerId>,
        forced: bool,
    },
    ActionResolved {
        subject: BattlerId,
        target: BattlerId,
        result: ActionResult,
    },
    CounterAttack {
        by: BattlerId,
        target: BattlerId,
    },
    Reflection {
        by: BattlerId,
        subject: BattlerId,
    },
    Substitute {
        substitute: BattlerId,
        target: BattlerId,
    },
    Drained {
        battler: BattlerId,
        hp: i32,
    },
    Collapsed {
        battler: BattlerId,
    },
    ActionEnded {
        subject: BattlerId,
    },
    /// An action was no longer usable when its turn came.
    ActionDiscarded {
        subject: BattlerId,
        reason: ActionError,
    },
    EventReserved {
        event: EventId,
    },
    StatusRemoved {
        battler: BattlerId,
        status: StatusKind,
    },
    Regeneration {
        battler: BattlerId,
        hp: i32,
        mp: i32,
    },
    TurnEnded {
        turn: u32,
    },
    EscapeAttempted {
        success: bool,
        ratio: f64,
    },
    RewardsGained(Rewards),
    LevelUp {
        battler: BattlerId,
        level: u32,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
    BattleFinished {
        outcome: BattleOutcome,
    },
}

/// Append-only record of published events.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventLog {
    events: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// SHA-256 of the bincode encoding of the stream.
    ///
    /// Two battles with the same seed, inputs and catalog yield the same digest.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(&self.events)?;
        Ok(Sha256::digest(&bytes).into())
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a BattleEvent;
    type IntoIter = core::slice::Iter<'a, BattleEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
