//! Common error infrastructure for battle-core.
//!
//! Domain errors live next to the code that raises them: [`SetupError`] is
//! returned before a session exists, [`crate::action::ActionError`] is
//! produced by action validation and swallowed by the session, and
//! [`CommandError`] reports misuse of the presentation-facing commands.

use crate::engine::Phase;
use crate::state::{ActorId, BattlerId, EnemyId, Side, TroopId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    Recoverable,

    /// Invalid input, should not be retried without changes.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Unrecoverable: the battle cannot be set up or continued.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant (logs, metrics, tests).
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while assembling the party, the troop or the session.
///
/// These are fatal for the battle: a session is never constructed from
/// malformed data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("troop {0} not found in catalog")]
    UnknownTroop(TroopId),

    #[error("troop {troop} references unknown enemy {enemy}")]
    UnknownEnemy { troop: TroopId, enemy: EnemyId },

    #[error("actor {0} not found in catalog")]
    UnknownActor(ActorId),

    #[error("troop {0} has no members")]
    EmptyTroop(TroopId),

    #[error("{side} exceeds {max} members")]
    TooManyMembers { side: Side, max: usize },

    #[error("troop agility is zero; escape odds are undefined")]
    ZeroTroopAgility,
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTroop(_) => "SETUP_UNKNOWN_TROOP",
            Self::UnknownEnemy { .. } => "SETUP_UNKNOWN_ENEMY",
            Self::UnknownActor(_) => "SETUP_UNKNOWN_ACTOR",
            Self::EmptyTroop(_) => "SETUP_EMPTY_TROOP",
            Self::TooManyMembers { .. } => "SETUP_TOO_MANY_MEMBERS",
            Self::ZeroTroopAgility => "SETUP_ZERO_TROOP_AGILITY",
        }
    }
}

/// Errors returned by session commands issued from the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("command requires phase {expected}, session is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("escape is not allowed in this battle")]
    EscapeForbidden,

    #[error("no actor is currently inputting")]
    NoInputtingActor,

    #[error("battler {0} does not exist")]
    UnknownBattler(BattlerId),

    #[error("battler {0} is not alive and cannot be forced to act")]
    BattlerCannotAct(BattlerId),
}

impl BattleError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } | Self::NoInputtingActor => ErrorSeverity::Recoverable,
            Self::EscapeForbidden | Self::UnknownBattler(_) | Self::BattlerCannotAct(_) => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "COMMAND_WRONG_PHASE",
            Self::EscapeForbidden => "COMMAND_ESCAPE_FORBIDDEN",
            Self::NoInputtingActor => "COMMAND_NO_INPUTTING_ACTOR",
            Self::UnknownBattler(_) => "COMMAND_UNKNOWN_BATTLER",
            Self::BattlerCannotAct(_) => "COMMAND_BATTLER_CANNOT_ACT",
        }
    }
}
