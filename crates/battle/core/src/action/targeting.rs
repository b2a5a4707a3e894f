//! Target resolution for an action's scope.
//!
//! Targets are resolved once when the action starts. Each resolved target is
//! then repeated `repeats` times; repeats never re-pick.

use super::{Action, Scope, Usable};
use crate::env::BattleRng;
use crate::state::{BattlerId, Combatants};

/// Resolves the full target list of `action`, repeats included.
pub fn make_targets(
    action: &Action,
    usable: &Usable,
    units: &Combatants,
    rng: &mut dyn BattleRng,
) -> Vec<BattlerId> {
    let targets = if usable.scope.is_for_opponent() {
        targets_for_opponents(action, usable.scope, units, rng)
    } else if usable.scope.is_for_friend() {
        targets_for_friends(action, usable.scope, units, rng)
    } else {
        Vec::new()
    };
    repeat_targets(targets, usable.num_repeats())
}

fn targets_for_opponents(
    action: &Action,
    scope: Scope,
    units: &Combatants,
    rng: &mut dyn BattleRng,
) -> Vec<BattlerId> {
    let unit = units.opponents_of(action.subject);
    match scope {
        Scope::RandomEnemies(count) => (0..count)
            .filter_map(|_| unit.random_target(rng))
            .collect(),
        Scope::OneEnemy => match action.target_index {
            Some(index) => unit.smooth_target(index).into_iter().collect(),
            None => unit.random_target(rng).into_iter().collect(),
        },
        _ => unit.alive_members().map(|battler| battler.id).collect(),
    }
}

fn targets_for_friends(
    action: &Action,
    scope: Scope,
    units: &Combatants,
    rng: &mut dyn BattleRng,
) -> Vec<BattlerId> {
    let unit = units.friends_of(action.subject);
    match scope {
        Scope::User => vec![action.subject],
        Scope::OneDeadAlly => match action.target_index {
            Some(index) => unit.smooth_dead_target(index).into_iter().collect(),
            None => unit.random_dead_target(rng).into_iter().collect(),
        },
        Scope::AllDeadAllies => unit.dead_members().map(|battler| battler.id).collect(),
        Scope::OneAlly => match action.target_index {
            Some(index) => unit.smooth_target(index).into_iter().collect(),
            None => unit.random_target(rng).into_iter().collect(),
        },
        _ => unit.alive_members().map(|battler| battler.id).collect(),
    }
}

fn repeat_targets(targets: Vec<BattlerId>, repeats: usize) -> Vec<BattlerId> {
    targets
        .into_iter()
        .flat_map(|target| std::iter::repeat_n(target, repeats))
        .collect()
}
