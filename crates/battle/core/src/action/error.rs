use crate::error::{BattleError, ErrorSeverity};
use crate::state::{BattlerId, ItemId, SkillId};

/// Reasons an action cannot be carried out when its turn comes.
///
/// The session never surfaces these to the player: the action is discarded
/// and the subject moves on to its next slot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("{0} has an empty action slot")]
    EmptyAction(BattlerId),

    #[error("subject {0} is not part of the battle")]
    SubjectMissing(BattlerId),

    #[error("subject {0} cannot move")]
    SubjectCannotMove(BattlerId),

    #[error("skill {0} not found in catalog")]
    UnknownSkill(SkillId),

    #[error("item {0} not found in catalog")]
    UnknownItem(ItemId),

    #[error("{subject} needs {required} MP, has {available}")]
    InsufficientMp {
        subject: BattlerId,
        required: i32,
        available: i32,
    },

    #[error("{subject} cannot use {item}: none left")]
    ItemUnavailable { subject: BattlerId, item: ItemId },
}

impl BattleError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SubjectMissing(_) | Self::UnknownSkill(_) | Self::UnknownItem(_) => {
                ErrorSeverity::Internal
            }
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyAction(_) => "ACTION_EMPTY",
            Self::SubjectMissing(_) => "ACTION_SUBJECT_MISSING",
            Self::SubjectCannotMove(_) => "ACTION_SUBJECT_CANNOT_MOVE",
            Self::UnknownSkill(_) => "ACTION_UNKNOWN_SKILL",
            Self::UnknownItem(_) => "ACTION_UNKNOWN_ITEM",
            Self::InsufficientMp { .. } => "ACTION_INSUFFICIENT_MP",
            Self::ItemUnavailable { .. } => "ACTION_ITEM_UNAVAILABLE",
        }
    }
}
