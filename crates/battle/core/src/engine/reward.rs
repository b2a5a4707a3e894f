//! Victory rewards.

use crate::config::BattleConfig;
use crate::env::{BattleRng, CatalogOracle, roll};
use crate::state::{BattlerId, Combatants, ItemId, PartyAbility, Role};

/// Experience, gold and drops earned from the defeated troop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub exp: u32,
    pub gold: u32,
    pub items: Vec<ItemId>,
}

/// An actor reaching a new level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub battler: BattlerId,
    pub level: u32,
}

/// Sums exp and gold of every defeated enemy and rolls each drop table once.
///
/// Gold is doubled with the gold-double ability; drop chances are doubled
/// with drop-item-double.
pub fn make_rewards(
    units: &Combatants,
    catalog: &dyn CatalogOracle,
    rng: &mut dyn BattleRng,
) -> Rewards {
    let gold_rate = if units.party.has_ability(PartyAbility::GOLD_DOUBLE) {
        2
    } else {
        1
    };
    let drop_rate = if units.party.has_ability(PartyAbility::DROP_ITEM_DOUBLE) {
        2.0
    } else {
        1.0
    };

    let mut rewards = Rewards::default();
    for battler in units.troop.roster.dead_members() {
        let Role::Enemy(profile) = &battler.role else {
            continue;
        };
        let Some(def) = catalog.enemy(profile.enemy_id) else {
            continue;
        };
        rewards.exp = rewards.exp.saturating_add(def.exp);
        rewards.gold = rewards.gold.saturating_add(def.gold);
        for drop in &def.drops {
            if drop.denominator > 0 && roll(rng, drop_rate / f64::from(drop.denominator)) {
                rewards.items.push(drop.item);
            }
        }
    }
    rewards.gold = rewards.gold.saturating_mul(gold_rate);
    rewards
}

/// Grants `rewards` to the party.
///
/// Exp (scaled by each actor's `exr`) goes to surviving battle members only.
pub fn gain_rewards(
    rewards: &Rewards,
    units: &mut Combatants,
    config: &BattleConfig,
) -> Vec<LevelUp> {
    let mut level_ups = Vec::new();
    for battler in units.party.roster.members_mut() {
        if !battler.is_alive() {
            continue;
        }
        let exr = battler.rates.exr;
        let id = battler.id;
        let Role::Actor(profile) = &mut battler.role else {
            continue;
        };
        let gained = (f64::from(rewards.exp) * exr).round().max(0.0) as u32;
        profile.exp = profile.exp.saturating_add(gained);
        while profile.level < config.max_level
            && profile.exp >= profile.exp_curve.exp_for_level(profile.level + 1)
        {
            profile.level += 1;
            level_ups.push(LevelUp {
                battler: id,
                level: profile.level,
            });
        }
    }

    units.party.gain_gold(rewards.gold, config.max_gold);
    for &item in &rewards.items {
        units.party.gain_item(item, 1);
    }
    level_ups
}
