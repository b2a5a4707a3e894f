//! Round action order.

use std::cmp::Reverse;
use std::collections::VecDeque;

use super::Encounter;
use crate::config::BattleConfig;
use crate::env::{BattleRng, CatalogOracle};
use crate::state::{Battler, BattlerId, Combatants};

/// Speed of one action: `agi + random_int(floor(base + agi / divisor)) + item.speed`.
pub fn action_speed(
    agi: i32,
    item_speed: i32,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> i32 {
    let divisor = f64::from(config.speed_variance_divisor.max(1));
    let variance = (f64::from(config.speed_variance_base) + f64::from(agi) / divisor).floor() as i32;
    agi + rng.random_int(variance) + item_speed
}

/// Rolls a fresh speed: the slowest of the battler's queued actions, `0` with none.
pub fn make_speed(
    battler: &mut Battler,
    catalog: &dyn CatalogOracle,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) {
    let agi = battler.params.agi;
    let item_speeds: Vec<i32> = battler
        .actions()
        .map(|action| {
            action
                .item
                .and_then(|item| catalog.usable(item))
                .map_or(0, |usable| usable.speed)
        })
        .collect();
    let speed = item_speeds
        .into_iter()
        .map(|item_speed| action_speed(agi, item_speed, config, rng))
        .min()
        .unwrap_or(0);
    battler.set_speed(speed);
}

/// Builds the round queue: living battle members sorted by descending speed.
///
/// Under surprise the party sits the round out, under preemptive the troop
/// does. Ties keep roster order (party first, then slot order).
pub fn make_action_orders(
    units: &mut Combatants,
    encounter: Encounter,
    catalog: &dyn CatalogOracle,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> VecDeque<BattlerId> {
    let mut battlers: Vec<BattlerId> = Vec::new();
    if !encounter.surprise {
        battlers.extend(units.party.roster.alive_members().map(|b| b.id));
    }
    if !encounter.preemptive {
        battlers.extend(units.troop.roster.alive_members().map(|b| b.id));
    }

    for &id in &battlers {
        if let Some(battler) = units.battler_mut(id) {
            make_speed(battler, catalog, config, rng);
        }
    }
    battlers.sort_by_key(|&id| Reverse(units.battler(id).map_or(0, Battler::speed)));
    battlers.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    #[test]
    fn speed_variance_scales_with_agility() {
        let config = BattleConfig::default();
        // agi 20: variance floor(5 + 20 / 4) = 10; 0.55 * 10 -> 5.
        let mut rng = SequenceRng::new([0.55]);
        assert_eq!(action_speed(20, 0, &config, &mut rng), 25);

        // agi 0: variance 5; 0.99 * 5 -> 4, plus item speed.
        let mut rng = SequenceRng::new([0.99]);
        assert_eq!(action_speed(0, -3, &config, &mut rng), 1);
    }
}
