//! Application of a skill or item to one target.
//!
//! The hit test, damage roll and effects run against a [`SubjectStats`]
//! snapshot of the user and a mutable target. Counter, reflection and
//! substitution decide *who* the subject and target are before this runs.

use super::{DamageKind, DamageSpec, ItemEffect, Usable};
use crate::config::BattleConfig;
use crate::env::{BattleRng, roll};
use crate::state::{Battler, EventId, MotionRequest, StatusKind, SubjectStats};

/// Outcome of applying an action to one target, kept for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    /// The scope matched the target's life state.
    pub used: bool,
    pub missed: bool,
    pub evaded: bool,
    pub critical: bool,
    /// Something actually changed on the target.
    pub success: bool,
    /// HP lost by the target; negative for recovery.
    pub hp_damage: i32,
    /// MP lost by the target; negative for recovery.
    pub mp_damage: i32,
    /// HP taken by a drain, to be credited to the drainer.
    pub drained: i32,
    pub added_statuses: Vec<StatusKind>,
    pub removed_statuses: Vec<StatusKind>,
    /// The target died from this application.
    pub collapsed: bool,
}

impl ActionResult {
    pub fn is_hit(&self) -> bool {
        self.used && !self.missed && !self.evaded
    }
}

/// Applies `usable` from `subject` to `target`.
pub fn apply(
    subject: &SubjectStats,
    usable: &Usable,
    target: &mut Battler,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> ActionResult {
    let was_alive = target.is_alive();
    let mut result = ActionResult {
        used: test_apply(usable, target),
        ..ActionResult::default()
    };
    result.missed = result.used && !roll(rng, item_hit(subject, usable));
    result.evaded = result.used && !result.missed && roll(rng, item_eva(usable, target));

    if result.is_hit() {
        if let Some(damage) = usable.damage {
            result.critical =
                damage.critical && roll(rng, subject.rates.cri * (1.0 - target.rates.cev));
            let value = make_damage_value(subject, &damage, target, result.critical, config, rng);
            execute_damage(&damage, value, target, &mut result);
        }
        for effect in usable.effects.iter().filter(|effect| !effect.is_global()) {
            apply_effect(subject, usable, effect, target, &mut result, rng);
        }
        if result.hp_damage > 0 {
            target.motion.insert(MotionRequest::DAMAGE);
        }
    } else if result.used {
        target.motion.insert(MotionRequest::EVADE);
    }

    result.collapsed = was_alive && target.is_dead();
    target.result = Some(result.clone());
    result
}

/// Scripted events reserved once per action, whatever the number of targets.
pub fn global_events(usable: &Usable) -> impl Iterator<Item = EventId> + '_ {
    usable.effects.iter().filter_map(|effect| match effect {
        ItemEffect::ReserveEvent(id) => Some(*id),
        _ => None,
    })
}

/// Dead-ally scopes need dead targets; every other scope needs living ones.
fn test_apply(usable: &Usable, target: &Battler) -> bool {
    if usable.scope.is_for_dead_friend() {
        target.is_dead()
    } else {
        target.is_alive()
    }
}

fn item_hit(subject: &SubjectStats, usable: &Usable) -> f64 {
    if usable.is_physical() {
        usable.success_rate * subject.rates.hit
    } else {
        usable.success_rate
    }
}

fn item_eva(usable: &Usable, target: &Battler) -> f64 {
    if usable.is_physical() {
        target.rates.eva
    } else if usable.is_magical() {
        target.rates.mev
    } else {
        0.0
    }
}

/// Counter chance of `target` against this action.
pub fn item_cnt(usable: &Usable, target: &Battler) -> f64 {
    if usable.is_physical() && target.can_move() {
        target.rates.cnt
    } else {
        0.0
    }
}

/// Reflection chance of `target` against this action.
pub fn item_mrf(usable: &Usable, target: &Battler) -> f64 {
    if usable.is_magical() {
        target.rates.mrf
    } else {
        0.0
    }
}

fn make_damage_value(
    subject: &SubjectStats,
    damage: &DamageSpec,
    target: &Battler,
    critical: bool,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> i32 {
    let a = &subject.params;
    let b = &target.params;
    let f = &damage.formula;
    let base = (f.base + a.atk * f.atk + a.mat * f.mat - b.def * f.def - b.mdf * f.mdf).max(0);

    let mut value = f64::from(base);
    if damage.kind.is_recover() {
        value = -value * target.rates.rec;
    }
    if critical {
        value *= config.critical_multiplier;
    }
    value = apply_variance(value, damage.variance, rng);
    value = apply_guard(value, target);
    // Half-up.
    (value + 0.5).floor() as i32
}

fn apply_variance(value: f64, variance: u8, rng: &mut dyn BattleRng) -> f64 {
    let amp = (value.abs() * f64::from(variance) / 100.0).floor().max(0.0) as i32;
    if amp == 0 {
        return value;
    }
    let v = f64::from(rng.random_int(amp + 1) + rng.random_int(amp + 1) - amp);
    if value >= 0.0 { value + v } else { value - v }
}

fn apply_guard(value: f64, target: &Battler) -> f64 {
    if value > 0.0 && target.is_guard() {
        value / (2.0 * target.rates.grd)
    } else {
        value
    }
}

fn execute_damage(damage: &DamageSpec, value: i32, target: &mut Battler, result: &mut ActionResult) {
    if value == 0 {
        result.critical = false;
    }
    if damage.kind.targets_mp() {
        let value = if damage.kind == DamageKind::MpRecover {
            value
        } else {
            value.min(target.mp())
        };
        if value != 0 {
            result.success = true;
        }
        result.mp_damage = value;
        target.gain_mp(-value);
    } else {
        let value = if damage.kind == DamageKind::HpDrain {
            value.min(target.hp())
        } else {
            value
        };
        result.success = true;
        result.hp_damage = value;
        target.gain_hp(-value);
        if damage.kind == DamageKind::HpDrain {
            result.drained = value;
        }
    }
}

fn apply_effect(
    subject: &SubjectStats,
    usable: &Usable,
    effect: &ItemEffect,
    target: &mut Battler,
    result: &mut ActionResult,
    rng: &mut dyn BattleRng,
) {
    match *effect {
        ItemEffect::RecoverHp { rate, flat } => {
            let value = recover_value(target.params.mhp, rate, flat, target.rates.rec);
            if value != 0 {
                target.gain_hp(value);
                result.hp_damage -= value;
                result.success = true;
            }
        }
        ItemEffect::RecoverMp { rate, flat } => {
            let value = recover_value(target.params.mmp, rate, flat, target.rates.rec);
            if value != 0 {
                target.gain_mp(value);
                result.mp_damage -= value;
                result.success = true;
            }
        }
        ItemEffect::AddStatus { status, chance } => {
            let chance = if usable.is_certain_hit() {
                chance
            } else {
                chance * luk_effect_rate(subject, target)
            };
            if target.is_alive() && roll(rng, chance) && target.statuses.add(status) {
                result.added_statuses.push(status);
                result.success = true;
            }
        }
        ItemEffect::RemoveStatus(status) => {
            if target.statuses.remove(status) {
                result.removed_statuses.push(status);
                result.success = true;
            }
        }
        ItemEffect::ReserveEvent(_) => {}
    }
}

fn recover_value(max: i32, rate: f64, flat: i32, rec: f64) -> i32 {
    ((f64::from(max) * rate + f64::from(flat)) * rec).floor() as i32
}

fn luk_effect_rate(subject: &SubjectStats, target: &Battler) -> f64 {
    (1.0 + f64::from(subject.params.luk - target.params.luk) * 0.001).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{DamageFormula, HitType, Scope};
    use crate::env::SequenceRng;
    use crate::state::{BattlerId, EnemyId, EnemyProfile, Params, Rates, Role};

    fn battler(id: BattlerId, params: Params) -> Battler {
        Battler::new(
            id,
            "Test",
            Role::Enemy(EnemyProfile {
                enemy_id: EnemyId(1),
            }),
            params,
        )
        .with_rates(Rates {
            hit: 1.0,
            eva: 0.0,
            cri: 0.0,
            ..Rates::default()
        })
    }

    fn attack() -> Usable {
        Usable::new("Attack", Scope::OneEnemy, HitType::Physical).with_damage(DamageSpec {
            kind: DamageKind::HpDamage,
            formula: DamageFormula::ATTACK,
            variance: 0,
            critical: true,
        })
    }

    #[test]
    fn attack_formula_without_variance() {
        let subject = battler(BattlerId::party(0), Params::new(100, 0, 10, 0, 0, 0, 10, 0));
        let mut target = battler(BattlerId::troop(0), Params::new(100, 0, 0, 5, 0, 0, 5, 0));
        let mut rng = SequenceRng::new([]);

        let result = apply(
            &subject.snapshot(),
            &attack(),
            &mut target,
            &BattleConfig::default(),
            &mut rng,
        );

        assert!(result.is_hit());
        assert_eq!(result.hp_damage, 30);
        assert_eq!(target.hp(), 70);
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn guard_halves_damage() {
        let subject = battler(BattlerId::party(0), Params::new(100, 0, 10, 0, 0, 0, 10, 0));
        let mut target = battler(BattlerId::troop(0), Params::new(100, 0, 0, 0, 0, 0, 5, 0));
        target.statuses.add(StatusKind::Guard);

        let result = apply(
            &subject.snapshot(),
            &attack(),
            &mut target,
            &BattleConfig::default(),
            &mut SequenceRng::new([]),
        );
        assert_eq!(result.hp_damage, 20);
    }

    #[test]
    fn drain_is_capped_by_remaining_hp() {
        let subject = battler(BattlerId::party(0), Params::new(100, 0, 10, 0, 0, 0, 10, 0));
        let mut target =
            battler(BattlerId::troop(0), Params::new(100, 0, 0, 0, 0, 0, 5, 0)).with_hp(12);
        let mut usable = attack();
        if let Some(damage) = usable.damage.as_mut() {
            damage.kind = DamageKind::HpDrain;
        }

        let result = apply(
            &subject.snapshot(),
            &usable,
            &mut target,
            &BattleConfig::default(),
            &mut SequenceRng::new([]),
        );
        assert_eq!(result.drained, 12);
        assert!(result.collapsed);
    }

    #[test]
    fn evaded_actions_change_nothing() {
        let subject = battler(BattlerId::party(0), Params::new(100, 0, 10, 0, 0, 0, 10, 0));
        let mut target = battler(BattlerId::troop(0), Params::new(100, 0, 0, 0, 0, 0, 5, 0))
            .with_rates(Rates {
                hit: 1.0,
                eva: 0.5,
                ..Rates::default()
            });
        let mut rng = SequenceRng::new([0.1]);

        let result = apply(
            &subject.snapshot(),
            &attack(),
            &mut target,
            &BattleConfig::default(),
            &mut rng,
        );
        assert!(result.evaded);
        assert_eq!(target.hp(), 100);
        assert!(target.motion.contains(MotionRequest::EVADE));
    }

    #[test]
    fn revive_scope_only_hits_dead_allies() {
        let subject = battler(BattlerId::party(0), Params::new(100, 0, 10, 0, 0, 0, 10, 0));
        let mut alive = battler(BattlerId::party(1), Params::new(100, 0, 0, 0, 0, 0, 5, 0));
        let revive = Usable::new("Revive", Scope::OneDeadAlly, HitType::CertainHit).with_effect(
            ItemEffect::RecoverHp {
                rate: 0.5,
                flat: 0,
            },
        );

        let result = apply(
            &subject.snapshot(),
            &revive,
            &mut alive,
            &BattleConfig::default(),
            &mut SequenceRng::new([]),
        );
        assert!(!result.used);
    }
}
