/// Phases of the battle state machine.
///
/// ```text
/// Init -> Start -> Input -> Turn <-> Action
///                    ^        |
///                    |        v
///                    +--- TurnEnd
///
/// Start/Turn/TurnEnd -> BattleEnd -> Finished   (victory, defeat)
/// any -> Aborting -> BattleEnd -> Finished      (escape, abort)
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Phase {
    /// Session constructed, battle not started yet.
    #[default]
    Init,
    /// Start messages shown; commands are made on the next tick.
    Start,
    /// Waiting for player commands.
    Input,
    /// Picking the next subject and action of the round.
    Turn,
    /// Applying the current action to its targets, one per tick.
    Action,
    /// Round finished; regeneration and status countdown done.
    TurnEnd,
    /// Escape succeeded or abort requested; ends the battle on the next check.
    Aborting,
    /// Outcome decided; end-of-battle effects are playing.
    BattleEnd,
    /// Nothing left to do. The host may drop the session.
    Finished,
}

impl Phase {
    /// Phases in which forced actions and battle events are processed.
    pub const fn accepts_events(self) -> bool {
        matches!(self, Phase::Start | Phase::Turn | Phase::TurnEnd)
    }
}

/// How the battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// The party fled.
    Escaped,
    /// The battle was stopped from outside, or the party was empty.
    Aborted,
}

/// Advantage rolled when the encounter starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    /// The party strikes first; the troop sits out the first round.
    pub preemptive: bool,
    /// The troop strikes first; the party sits out the first round.
    pub surprise: bool,
}

impl Encounter {
    pub const NORMAL: Self = Self {
        preemptive: false,
        surprise: false,
    };
}

/// Result of the abort check run before phase dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortCheck {
    /// Nothing to abort; dispatch continues.
    Continue,
    /// The battle was ended this tick; dispatch is skipped.
    Handled,
}
