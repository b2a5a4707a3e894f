use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Built-in status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    /// Divides incoming damage by `2 * grd`.
    Guard,
    /// Cannot move or input commands.
    Stun,
    /// Loses 10% max HP at the end of every turn.
    Poison,
}

/// When a status counts down its remaining turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoRemoval {
    /// After the owner finished all of its actions for the turn.
    ActionEnd,
    /// At the end of every turn.
    TurnEnd,
}

impl StatusKind {
    pub const fn auto_removal(self) -> AutoRemoval {
        match self {
            StatusKind::Guard => AutoRemoval::ActionEnd,
            StatusKind::Stun | StatusKind::Poison => AutoRemoval::TurnEnd,
        }
    }

    pub const fn duration(self) -> u8 {
        match self {
            StatusKind::Guard | StatusKind::Stun => 1,
            StatusKind::Poison => 3,
        }
    }

    pub const fn restricts_movement(self) -> bool {
        matches!(self, StatusKind::Stun)
    }

    /// HP regeneration contributed while the status is active.
    pub const fn hp_regen_rate(self) -> f64 {
        match self {
            StatusKind::Poison => -0.1,
            _ => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub turns_left: u8,
}

/// Active statuses of one battler. Adding an active status refreshes its duration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    /// Adds or refreshes a status. Returns false when the list is full.
    pub fn add(&mut self, kind: StatusKind) -> bool {
        if let Some(effect) = self.effects.iter_mut().find(|effect| effect.kind == kind) {
            effect.turns_left = kind.duration();
            return true;
        }
        self.effects
            .try_push(StatusEffect {
                kind,
                turns_left: kind.duration(),
            })
            .is_ok()
    }

    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.kind != kind);
        before != self.effects.len()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.effects.iter().map(|effect| effect.kind)
    }

    pub fn restricts_movement(&self) -> bool {
        self.iter().any(StatusKind::restricts_movement)
    }

    pub fn hp_regen_rate(&self) -> f64 {
        self.iter().map(StatusKind::hp_regen_rate).sum()
    }

    /// Counts down statuses with the given timing and removes expired ones.
    pub fn tick(
        &mut self,
        timing: AutoRemoval,
    ) -> ArrayVec<StatusKind, { BattleConfig::MAX_STATUS_EFFECTS }> {
        let mut expired = ArrayVec::new();
        for effect in self.effects.iter_mut() {
            if effect.kind.auto_removal() == timing {
                effect.turns_left = effect.turns_left.saturating_sub(1);
                if effect.turns_left == 0 {
                    expired.push(effect.kind);
                }
            }
        }
        self.effects.retain(|effect| effect.turns_left > 0);
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_expires_on_action_end_only() {
        let mut statuses = StatusEffects::new();
        statuses.add(StatusKind::Guard);
        statuses.add(StatusKind::Poison);

        assert!(statuses.tick(AutoRemoval::TurnEnd).is_empty());
        assert!(statuses.contains(StatusKind::Guard));

        let expired = statuses.tick(AutoRemoval::ActionEnd);
        assert_eq!(expired.as_slice(), &[StatusKind::Guard]);
        assert!(statuses.contains(StatusKind::Poison));
    }

    #[test]
    fn re_adding_refreshes_duration() {
        let mut statuses = StatusEffects::new();
        statuses.add(StatusKind::Poison);
        statuses.tick(AutoRemoval::TurnEnd);
        statuses.tick(AutoRemoval::TurnEnd);
        statuses.add(StatusKind::Poison);

        statuses.tick(AutoRemoval::TurnEnd);
        statuses.tick(AutoRemoval::TurnEnd);
        assert!(statuses.contains(StatusKind::Poison));
        assert_eq!(
            statuses.tick(AutoRemoval::TurnEnd).as_slice(),
            &[StatusKind::Poison]
        );
    }
}
