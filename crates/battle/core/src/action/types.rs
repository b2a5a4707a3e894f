use crate::config::BattleConfig;
use crate::state::{BattlerId, ItemId, SkillId};

use super::ActionItem;

/// A battler's intent for one action slot of the turn.
///
/// Actions start empty when the turn's slots are created and are filled by
/// player input or computer selection. An empty action is discarded when its
/// turn comes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub subject: BattlerId,
    pub item: Option<ActionItem>,
    /// Chosen slot for single-target scopes; `None` picks a random target.
    pub target_index: Option<u8>,
    /// Forced actions skip the usability check.
    pub forcing: bool,
}

impl Action {
    pub const fn new(subject: BattlerId) -> Self {
        Self {
            subject,
            item: None,
            target_index: None,
            forcing: false,
        }
    }

    pub const fn forced(subject: BattlerId, item: ActionItem, target_index: Option<u8>) -> Self {
        Self {
            subject,
            item: Some(item),
            target_index,
            forcing: true,
        }
    }

    pub fn set_skill(&mut self, id: SkillId) {
        self.item = Some(ActionItem::Skill(id));
    }

    pub fn set_item(&mut self, id: ItemId) {
        self.item = Some(ActionItem::Item(id));
    }

    pub fn set_attack(&mut self, config: &BattleConfig) {
        self.set_skill(config.attack_skill);
    }

    pub fn set_guard(&mut self, config: &BattleConfig) {
        self.set_skill(config.guard_skill);
    }

    pub fn set_target(&mut self, index: u8) {
        self.target_index = Some(index);
    }

    pub fn clear(&mut self) {
        self.item = None;
        self.target_index = None;
    }

    pub const fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub fn is_attack(&self, config: &BattleConfig) -> bool {
        self.item == Some(ActionItem::Skill(config.attack_skill))
    }

    pub fn is_guard(&self, config: &BattleConfig) -> bool {
        self.item == Some(ActionItem::Skill(config.guard_skill))
    }
}
