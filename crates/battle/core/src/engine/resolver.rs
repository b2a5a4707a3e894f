//! Per-target invocation: counter, reflection or normal application.
//!
//! For each target the chain is decided by two rolls. A successful counter
//! replaces the action with the target's basic attack against the subject; a
//! successful reflection turns the action back on the subject; otherwise the
//! action lands, possibly on a substitute covering a dying target. The three
//! outcomes are exclusive.

use tracing::debug;

use super::BattleContext;
use crate::action::{Usable, apply, item_cnt, item_mrf};
use crate::config::BattleConfig;
use crate::env::{BattleRng, roll};
use crate::event::BattleEvent;
use crate::state::BattlerId;

/// Which branch of the chain resolved a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// Applied to `target`, which is the substitute when one stepped in.
    Normal { target: BattlerId },
    CounterAttack,
    Reflection,
    /// Target no longer exists.
    Skipped,
}

pub(crate) fn invoke_action(
    ctx: &mut BattleContext<'_>,
    subject: BattlerId,
    target: BattlerId,
    usable: &Usable,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> InvokeOutcome {
    let Some(target_battler) = ctx.units.battler(target) else {
        return InvokeOutcome::Skipped;
    };
    let cnt = item_cnt(usable, target_battler);
    let mrf = item_mrf(usable, target_battler);

    let outcome = if roll(rng, cnt) {
        invoke_counter_attack(ctx, subject, target, config, rng)
    } else if roll(rng, mrf) {
        invoke_magic_reflection(ctx, subject, target, usable, config, rng)
    } else {
        invoke_normal_action(ctx, subject, target, usable, config, rng)
    };

    if let Some(battler) = ctx.units.battler_mut(subject) {
        battler.set_last_target(target);
    }
    outcome
}

fn invoke_counter_attack(
    ctx: &mut BattleContext<'_>,
    subject: BattlerId,
    target: BattlerId,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> InvokeOutcome {
    debug!(%subject, %target, "counter attack");
    ctx.publish(BattleEvent::CounterAttack {
        by: target,
        target: subject,
    });
    let catalog = ctx.catalog;
    let Some(attack) = catalog.skill(config.attack_skill).map(|skill| &skill.usable) else {
        return InvokeOutcome::CounterAttack;
    };
    apply_to(ctx, target, subject, attack, config, rng, target);
    InvokeOutcome::CounterAttack
}

fn invoke_magic_reflection(
    ctx: &mut BattleContext<'_>,
    subject: BattlerId,
    target: BattlerId,
    usable: &Usable,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> InvokeOutcome {
    debug!(%subject, %target, "magic reflection");
    ctx.publish(BattleEvent::Reflection {
        by: target,
        subject,
    });
    // Drained HP goes to the reflector.
    apply_to(ctx, subject, subject, usable, config, rng, target);
    InvokeOutcome::Reflection
}

fn invoke_normal_action(
    ctx: &mut BattleContext<'_>,
    subject: BattlerId,
    target: BattlerId,
    usable: &Usable,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> InvokeOutcome {
    let real_target = apply_substitute(ctx, target, usable, config);
    apply_to(ctx, subject, real_target, usable, config, rng, subject);
    InvokeOutcome::Normal {
        target: real_target,
    }
}

/// A dying target hit by anything but a certain-hit action is covered by the
/// first substitute of its side, if that is someone else.
fn apply_substitute(
    ctx: &mut BattleContext<'_>,
    target: BattlerId,
    usable: &Usable,
    config: &BattleConfig,
) -> BattlerId {
    let dying = ctx
        .units
        .battler(target)
        .is_some_and(|battler| battler.is_dying(config.dying_hp_ratio));
    if !dying || usable.is_certain_hit() {
        return target;
    }
    match ctx.units.friends_of(target).substitute_battler() {
        Some(substitute) if substitute != target => {
            debug!(%substitute, %target, "substitute");
            ctx.publish(BattleEvent::Substitute { substitute, target });
            substitute
        }
        _ => target,
    }
}

fn apply_to(
    ctx: &mut BattleContext<'_>,
    user: BattlerId,
    target: BattlerId,
    usable: &Usable,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
    drain_receiver: BattlerId,
) {
    let Some(stats) = ctx.units.battler(user).map(|battler| battler.snapshot()) else {
        return;
    };
    let Some(battler) = ctx.units.battler_mut(target) else {
        return;
    };
    let result = apply(&stats, usable, battler, config, rng);

    if result.drained > 0 {
        if let Some(receiver) = ctx.units.battler_mut(drain_receiver) {
            receiver.gain_hp(result.drained);
        }
        ctx.publish(BattleEvent::Drained {
            battler: drain_receiver,
            hp: result.drained,
        });
    }
    let collapsed = result.collapsed;
    ctx.publish(BattleEvent::ActionResolved {
        subject: user,
        target,
        result,
    });
    if collapsed {
        debug!(battler = %target, "collapsed");
        ctx.publish(BattleEvent::Collapsed { battler: target });
    }
}
