//! Computer action selection for enemies and auto-battle actors.

use super::{Action, validate};
use crate::config::BattleConfig;
use crate::env::{BattleRng, CatalogOracle};
use crate::state::{Battler, BattlerId, Combatants, Role, SkillId, StatusKind};

/// When a pattern may be chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatternCondition {
    #[default]
    Always,
    /// Turn `a + b * x` for some `x >= 0`; with `b == 0` only turn `a`.
    Turn { a: u32, b: u32 },
    /// HP ratio within `min..=max`.
    Hp { min: f64, max: f64 },
    /// MP ratio within `min..=max`.
    Mp { min: f64, max: f64 },
    HasStatus(StatusKind),
    PartyLevelAtLeast(u32),
}

/// One entry of an enemy's action table.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPattern {
    pub skill: SkillId,
    /// Priority from 1 to 9.
    pub rating: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: PatternCondition,
}

impl PatternCondition {
    pub fn is_met(&self, battler: &Battler, units: &Combatants) -> bool {
        match *self {
            PatternCondition::Always => true,
            PatternCondition::Turn { a, b } => {
                let n = units.troop.turn_count();
                if b == 0 {
                    n == a
                } else {
                    n > 0 && n >= a && n % b == a % b
                }
            }
            PatternCondition::Hp { min, max } => {
                let rate = ratio(battler.hp(), battler.params.mhp);
                (min..=max).contains(&rate)
            }
            PatternCondition::Mp { min, max } => {
                let rate = ratio(battler.mp(), battler.params.mmp);
                (min..=max).contains(&rate)
            }
            PatternCondition::HasStatus(status) => battler.statuses.contains(status),
            PatternCondition::PartyLevelAtLeast(level) => units.party.highest_level() >= level,
        }
    }
}

fn ratio(value: i32, max: i32) -> f64 {
    if max > 0 {
        f64::from(value) / f64::from(max)
    } else {
        0.0
    }
}

/// Fills every empty action slot of `battler_id` using its enemy pattern table.
///
/// Patterns whose condition fails or whose skill is unusable are ignored.
/// Of the rest, only those rated above `max_rating - 3` compete, weighted by
/// `rating - (max_rating - 3)`.
pub fn make_enemy_actions(
    battler_id: BattlerId,
    units: &mut Combatants,
    catalog: &dyn CatalogOracle,
    rng: &mut dyn BattleRng,
) {
    let (candidates, rating_zero) = {
        let units: &Combatants = units;
        let Some(battler) = units.battler(battler_id) else {
            return;
        };
        let Role::Enemy(profile) = &battler.role else {
            return;
        };
        let Some(def) = catalog.enemy(profile.enemy_id) else {
            return;
        };

        let usable: Vec<ActionPattern> = def
            .patterns
            .iter()
            .filter(|pattern| pattern.condition.is_met(battler, units))
            .filter(|pattern| {
                let mut probe = Action::new(battler_id);
                probe.set_skill(pattern.skill);
                validate(&probe, units, catalog).is_ok()
            })
            .copied()
            .collect();
        let Some(rating_max) = usable.iter().map(|pattern| pattern.rating).max() else {
            return;
        };
        let rating_zero = rating_max - 3;
        let candidates: Vec<ActionPattern> = usable
            .into_iter()
            .filter(|pattern| pattern.rating > rating_zero)
            .collect();
        (candidates, rating_zero)
    };

    let slots = units.battler(battler_id).map_or(0, Battler::action_count);
    let picks: Vec<SkillId> = (0..slots)
        .filter_map(|_| select_pattern(&candidates, rating_zero, rng))
        .map(|pattern| pattern.skill)
        .collect();

    if let Some(battler) = units.battler_mut(battler_id) {
        for (action, skill) in battler.actions_mut().zip(picks) {
            action.set_skill(skill);
        }
    }
}

fn select_pattern<'a>(
    candidates: &'a [ActionPattern],
    rating_zero: i32,
    rng: &mut dyn BattleRng,
) -> Option<&'a ActionPattern> {
    let sum: i32 = candidates
        .iter()
        .map(|pattern| pattern.rating - rating_zero)
        .sum();
    if sum <= 0 {
        return None;
    }
    let mut value = rng.random_int(sum);
    for pattern in candidates {
        value -= pattern.rating - rating_zero;
        if value < 0 {
            return Some(pattern);
        }
    }
    None
}

/// Auto-battle actors attack a random opponent with every slot.
pub fn make_auto_battle_actions(battler: &mut Battler, config: &BattleConfig) {
    for action in battler.actions_mut() {
        action.set_attack(config);
        action.target_index = None;
    }
}
