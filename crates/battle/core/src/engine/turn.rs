//! Round flow: command making, turn order, action dispatch and turn end.

use tracing::debug;

use super::order::make_action_orders;
use super::resolver::invoke_action;
use super::session::ForcedResume;
use super::{BattleContext, BattleSession, Encounter, Phase};
use crate::action::{
    Action, ActionError, global_events, make_auto_battle_actions, make_enemy_actions,
    make_targets, pay_cost, validate,
};
use crate::event::BattleEvent;
use crate::state::{ActionState, BattlerId, Combatants, ExpiredStatuses, MotionRequest};

impl BattleSession {
    /// Creates this round's action slots and opens command input.
    ///
    /// Under surprise, or when no actor can take commands, input is skipped.
    pub(super) fn start_input(&mut self, ctx: &mut BattleContext<'_>) {
        self.set_phase(ctx, Phase::Input);
        self.make_actions(ctx);
        self.change_actor(ctx.units, None, ActionState::Undecided);
        if self.encounter.surprise || !ctx.units.party.roster.can_input() {
            self.start_turn(ctx);
        }
    }

    fn make_actions(&mut self, ctx: &mut BattleContext<'_>) {
        for battler in ctx.units.party.roster.members_mut() {
            battler.make_actions();
            if battler.is_auto_battle() {
                make_auto_battle_actions(battler, &self.config);
            }
        }
        for id in ctx.units.troop.roster.member_ids() {
            if let Some(battler) = ctx.units.battler_mut(id) {
                battler.make_actions();
            }
            make_enemy_actions(id, ctx.units, ctx.catalog, self.rng.as_mut());
        }
    }

    pub(super) fn start_turn(&mut self, ctx: &mut BattleContext<'_>) {
        self.set_phase(ctx, Phase::Turn);
        self.change_actor(ctx.units, None, ActionState::Waiting);
        ctx.units.troop.increase_turn();
        self.action_battlers = make_action_orders(
            ctx.units,
            self.encounter,
            ctx.catalog,
            &self.config,
            self.rng.as_mut(),
        );
        for battler in ctx.units.party.roster.members_mut() {
            battler.motion.insert(MotionRequest::REFRESH);
        }
        let turn = ctx.units.troop.turn_count();
        debug!(turn, order = ?self.action_battlers, "turn started");
        ctx.publish(BattleEvent::TurnStarted { turn });
    }

    pub(super) fn update_turn(&mut self, ctx: &mut BattleContext<'_>) {
        if self.subject.is_none() {
            self.subject = self.next_subject(ctx.units);
        }
        if self.subject.is_some() {
            self.process_turn(ctx);
        } else {
            self.end_turn(ctx);
        }
    }

    /// Next queued battler that is still alive and in the battle.
    fn next_subject(&mut self, units: &Combatants) -> Option<BattlerId> {
        while let Some(id) = self.action_battlers.pop_front() {
            if units
                .battler(id)
                .is_some_and(|battler| battler.battle_member && battler.is_alive())
            {
                return Some(id);
            }
        }
        None
    }

    /// Starts the subject's next usable action. Unusable actions are dropped
    /// in the same step; a subject with nothing left hands over to the next.
    fn process_turn(&mut self, ctx: &mut BattleContext<'_>) {
        let Some(subject) = self.subject else {
            return;
        };
        loop {
            let Some(action) = ctx
                .units
                .battler_mut(subject)
                .and_then(|battler| battler.remove_current_action())
            else {
                self.finish_subject(ctx, subject);
                self.subject = self.next_subject(ctx.units);
                return;
            };
            match validate(&action, ctx.units, ctx.catalog) {
                Ok(()) => {
                    self.start_action(ctx, action, false);
                    return;
                }
                Err(reason) => self.discard_action(ctx, subject, reason),
            }
        }
    }

    fn discard_action(
        &mut self,
        ctx: &mut BattleContext<'_>,
        subject: BattlerId,
        reason: ActionError,
    ) {
        debug!(%subject, %reason, "action discarded");
        ctx.publish(BattleEvent::ActionDiscarded { subject, reason });
    }

    fn finish_subject(&mut self, ctx: &mut BattleContext<'_>, subject: BattlerId) {
        let expired = match ctx.units.battler_mut(subject) {
            Some(battler) => battler.on_all_actions_end(),
            None => return,
        };
        publish_expired(ctx, subject, &expired);
    }

    fn start_action(&mut self, ctx: &mut BattleContext<'_>, action: Action, forced: bool) {
        let catalog = ctx.catalog;
        let Some(item) = action.item else {
            return;
        };
        let Some(usable) = catalog.usable(item) else {
            return;
        };
        let targets = make_targets(&action, usable, ctx.units, self.rng.as_mut());

        self.set_phase(ctx, Phase::Action);
        pay_cost(&action, ctx.units, catalog);
        if let Some(battler) = ctx.units.battler_mut(action.subject) {
            battler.action_state = ActionState::Acting;
            if action.is_guard(&self.config) {
                battler.motion.insert(MotionRequest::GUARD);
            } else if usable.is_physical() {
                battler.motion.insert(MotionRequest::ATTACK);
            }
        }
        for event in global_events(usable) {
            self.reserved_events.push(event);
            ctx.publish(BattleEvent::EventReserved { event });
        }

        debug!(subject = %action.subject, %item, ?targets, forced, "action started");
        ctx.publish(BattleEvent::ActionStarted {
            subject: action.subject,
            item,
            targets: targets.clone(),
            forced,
        });
        self.action = Some(action);
        self.targets = targets.into();
    }

    /// Applies the current action to its next target, or ends it.
    pub(super) fn update_action(&mut self, ctx: &mut BattleContext<'_>) {
        let (Some(subject), Some(action)) = (self.subject, self.action) else {
            self.end_action(ctx);
            return;
        };
        let Some(target) = self.targets.pop_front() else {
            self.end_action(ctx);
            return;
        };
        let catalog = ctx.catalog;
        let Some(usable) = action.item.and_then(|item| catalog.usable(item)) else {
            self.targets.clear();
            return;
        };
        invoke_action(ctx, subject, target, usable, &self.config, self.rng.as_mut());
    }

    fn end_action(&mut self, ctx: &mut BattleContext<'_>) {
        if let Some(subject) = self.subject {
            ctx.publish(BattleEvent::ActionEnded { subject });
        }
        self.action = None;
        self.targets.clear();

        match self.forced_resume.take() {
            Some(resume) => {
                if let Some(forced) = self.subject.filter(|&id| Some(id) != resume.subject) {
                    self.finish_subject(ctx, forced);
                }
                self.subject = resume.subject;
                self.set_phase(ctx, resume.phase);
            }
            None => self.set_phase(ctx, Phase::Turn),
        }
    }

    /// Regenerates and counts down statuses for every battle member.
    fn end_turn(&mut self, ctx: &mut BattleContext<'_>) {
        self.set_phase(ctx, Phase::TurnEnd);
        self.encounter = Encounter::NORMAL;

        for id in ctx.units.all_battle_members() {
            let Some(battler) = ctx.units.battler_mut(id) else {
                continue;
            };
            let (regen, expired) = battler.on_turn_end(self.turn_forced);
            if !regen.is_empty() {
                ctx.publish(BattleEvent::Regeneration {
                    battler: id,
                    hp: regen.hp,
                    mp: regen.mp,
                });
            }
            publish_expired(ctx, id, &expired);
        }

        let turn = ctx.units.troop.turn_count();
        ctx.publish(BattleEvent::TurnEnded { turn });
        self.turn_forced = false;
    }

    pub(super) fn update_turn_end(&mut self, ctx: &mut BattleContext<'_>) {
        self.start_input(ctx);
    }

    /// Runs the pending forced action right away, remembering where the
    /// round was interrupted.
    pub(super) fn process_forced_action(&mut self, ctx: &mut BattleContext<'_>) {
        let Some(forced) = self.forced_battler.take() else {
            return;
        };
        self.turn_forced = true;
        let resume = ForcedResume {
            phase: self.phase,
            subject: self.subject,
        };

        let action = ctx
            .units
            .battler_mut(forced)
            .and_then(|battler| battler.remove_current_action());
        let Some(action) = action else {
            debug!(%forced, "forced battler has no action");
            return;
        };
        if let Err(reason) = validate(&action, ctx.units, ctx.catalog) {
            self.discard_action(ctx, forced, reason);
            return;
        }

        self.forced_resume = Some(resume);
        self.subject = Some(forced);
        self.start_action(ctx, action, true);
    }
}

fn publish_expired(ctx: &mut BattleContext<'_>, battler: BattlerId, expired: &ExpiredStatuses) {
    for &status in expired {
        ctx.publish(BattleEvent::StatusRemoved { battler, status });
    }
}
