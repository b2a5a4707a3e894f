use std::collections::VecDeque;

use tracing::{debug, info};

use super::escape::{EscapeState, roll_encounter};
use super::reward::{Rewards, gain_rewards, make_rewards};
use super::{AbortCheck, BattleContext, BattleOutcome, Encounter, Phase};
use crate::action::{Action, ActionItem};
use crate::config::{BattleConfig, BattleOptions};
use crate::env::BattleRng;
use crate::error::{CommandError, SetupError};
use crate::event::BattleEvent;
use crate::state::{ActionState, Battler, BattlerId, Combatants, EventId, MotionRequest};

/// Where to return after a forced action interrupted the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct ForcedResume {
    pub phase: Phase,
    pub subject: Option<BattlerId>,
}

/// The battle controller: a poll-driven phase machine over borrowed combatants.
///
/// The host calls [`update`](Self::update) once per tick. Each call advances
/// at most one step, and none while the host reports it is busy. Party and
/// troop stay owned by the host; every call borrows them through a
/// [`BattleContext`].
///
/// ```text
/// let mut session = BattleSession::new(config, options, &units, rng)?;
/// session.on_encounter(&units);
/// session.start_battle(&mut ctx)?;
/// while !session.is_finished() {
///     session.update(&mut ctx);
/// }
/// ```
pub struct BattleSession {
    pub(super) config: BattleConfig,
    pub(super) options: BattleOptions,
    pub(super) rng: Box<dyn BattleRng>,

    pub(super) phase: Phase,
    pub(super) encounter: Encounter,
    pub(super) escape: EscapeState,
    /// Set by any abort, successful escape included.
    pub(super) escaped: bool,
    /// Set only when the party fled.
    pub(super) fled: bool,

    // ===== round cursor =====
    pub(super) action_battlers: VecDeque<BattlerId>,
    pub(super) subject: Option<BattlerId>,
    pub(super) action: Option<Action>,
    pub(super) targets: VecDeque<BattlerId>,
    /// Index among the party's battle members of the actor being commanded.
    pub(super) actor_index: Option<usize>,

    // ===== forced actions =====
    pub(super) forced_battler: Option<BattlerId>,
    pub(super) forced_resume: Option<ForcedResume>,
    pub(super) turn_forced: bool,

    // ===== outcome =====
    pub(super) rewards: Option<Rewards>,
    pub(super) outcome: Option<BattleOutcome>,
    pub(super) reserved_events: Vec<EventId>,
}

impl BattleSession {
    /// Validates the combatants and computes the initial escape ratio.
    pub fn new(
        config: BattleConfig,
        options: BattleOptions,
        units: &Combatants,
        rng: Box<dyn BattleRng>,
    ) -> Result<Self, SetupError> {
        if units.troop.roster.is_empty() {
            return Err(SetupError::EmptyTroop(units.troop.troop_id));
        }
        let escape = EscapeState::new(units, &config)?;
        debug!(
            troop = %units.troop.troop_id,
            escape_ratio = escape.ratio(),
            "battle session created"
        );

        Ok(Self {
            config,
            options,
            rng,
            phase: Phase::Init,
            encounter: Encounter::NORMAL,
            escape,
            escaped: false,
            fled: false,
            action_battlers: VecDeque::new(),
            subject: None,
            action: None,
            targets: VecDeque::new(),
            actor_index: None,
            forced_battler: None,
            forced_resume: None,
            turn_forced: false,
            rewards: None,
            outcome: None,
            reserved_events: Vec::new(),
        })
    }

    /// Rolls preemptive and surprise advantage for this encounter.
    pub fn on_encounter(&mut self, units: &Combatants) -> Encounter {
        self.encounter = roll_encounter(units, &self.config, self.rng.as_mut());
        self.encounter
    }

    /// Overrides the encounter advantage (scripted battles).
    pub fn set_encounter(&mut self, encounter: Encounter) {
        self.encounter = encounter;
    }

    /// Enters [`Phase::Start`] and announces the enemies.
    pub fn start_battle(&mut self, ctx: &mut BattleContext<'_>) -> Result<(), CommandError> {
        self.expect_phase(Phase::Init)?;
        for battler in ctx
            .units
            .party
            .roster
            .all_mut()
            .iter_mut()
            .chain(ctx.units.troop.roster.all_mut().iter_mut())
        {
            battler.on_battle_start();
        }
        self.set_phase(ctx, Phase::Start);

        for name in ctx.units.troop.enemy_names() {
            ctx.publish(BattleEvent::Emerged { name });
        }
        if self.encounter.preemptive {
            ctx.publish(BattleEvent::Preemptive);
        } else if self.encounter.surprise {
            ctx.publish(BattleEvent::Surprise);
        }
        info!(
            troop = %ctx.units.troop.troop_id,
            preemptive = self.encounter.preemptive,
            surprise = self.encounter.surprise,
            "battle started"
        );
        Ok(())
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the battle by at most one step.
    pub fn update(&mut self, ctx: &mut BattleContext<'_>) {
        if ctx.host.is_busy() || self.update_event(ctx) {
            return;
        }
        match self.phase {
            Phase::Start => self.start_input(ctx),
            Phase::Turn => self.update_turn(ctx),
            Phase::Action => self.update_action(ctx),
            Phase::TurnEnd => self.update_turn_end(ctx),
            Phase::BattleEnd => self.update_battle_end(ctx),
            Phase::Init | Phase::Input | Phase::Aborting | Phase::Finished => {}
        }
    }

    /// Runs forced actions, battle events and end checks. True consumes the tick.
    fn update_event(&mut self, ctx: &mut BattleContext<'_>) -> bool {
        if self.phase.accepts_events() {
            if self.forced_battler.is_some() {
                self.process_forced_action(ctx);
                return true;
            }
            return ctx.host.is_event_running() || self.check_battle_end(ctx);
        }
        self.check_abort(ctx) == AbortCheck::Handled
    }

    /// Abort first, then defeat, then victory.
    fn check_battle_end(&mut self, ctx: &mut BattleContext<'_>) -> bool {
        if self.check_abort(ctx) == AbortCheck::Handled {
            return true;
        }
        if ctx.units.party.roster.is_all_dead() {
            self.process_defeat(ctx);
            true
        } else if ctx.units.troop.roster.is_all_dead() {
            self.process_victory(ctx);
            true
        } else {
            false
        }
    }

    /// Ends the battle when an abort is pending or the party has no members.
    fn check_abort(&mut self, ctx: &mut BattleContext<'_>) -> AbortCheck {
        if matches!(
            self.phase,
            Phase::Init | Phase::BattleEnd | Phase::Finished
        ) {
            return AbortCheck::Continue;
        }
        if self.phase == Phase::Aborting || ctx.units.party.is_empty() {
            self.escaped = true;
            self.process_abort(ctx);
            return AbortCheck::Handled;
        }
        AbortCheck::Continue
    }

    // ========================================================================
    // Battle end
    // ========================================================================

    fn process_victory(&mut self, ctx: &mut BattleContext<'_>) {
        for battler in ctx.units.party.roster.members_mut() {
            battler.statuses.clear();
            if battler.is_alive() {
                battler.motion.insert(MotionRequest::VICTORY);
            }
        }
        if self.rewards.is_none() {
            let rewards = make_rewards(ctx.units, ctx.catalog, self.rng.as_mut());
            ctx.publish(BattleEvent::RewardsGained(rewards.clone()));
            for level_up in gain_rewards(&rewards, ctx.units, &self.config) {
                ctx.publish(BattleEvent::LevelUp {
                    battler: level_up.battler,
                    level: level_up.level,
                });
            }
            self.rewards = Some(rewards);
        }
        self.end_battle(ctx, BattleOutcome::Victory);
    }

    fn process_defeat(&mut self, ctx: &mut BattleContext<'_>) {
        self.end_battle(ctx, BattleOutcome::Defeat);
    }

    fn process_abort(&mut self, ctx: &mut BattleContext<'_>) {
        for battler in ctx.units.party.roster.members_mut() {
            battler.statuses.clear();
        }
        let outcome = if self.fled {
            BattleOutcome::Escaped
        } else {
            BattleOutcome::Aborted
        };
        self.end_battle(ctx, outcome);
    }

    fn end_battle(&mut self, ctx: &mut BattleContext<'_>, outcome: BattleOutcome) {
        self.outcome = Some(outcome);
        self.subject = None;
        self.action = None;
        self.targets.clear();
        self.action_battlers.clear();
        self.set_phase(ctx, Phase::BattleEnd);
        ctx.publish(BattleEvent::BattleEnded { outcome });
        info!(%outcome, turn = ctx.units.troop.turn_count(), "battle ended");
    }

    fn update_battle_end(&mut self, ctx: &mut BattleContext<'_>) {
        let outcome = self.outcome.unwrap_or(BattleOutcome::Aborted);
        if outcome == BattleOutcome::Defeat && self.options.can_lose {
            ctx.units.party.revive_battle_members();
        }
        for battler in ctx
            .units
            .party
            .roster
            .all_mut()
            .iter_mut()
            .chain(ctx.units.troop.roster.all_mut().iter_mut())
        {
            battler.on_battle_end();
        }
        self.set_phase(ctx, Phase::Finished);
        ctx.publish(BattleEvent::BattleFinished { outcome });
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Party actor currently being commanded.
    pub fn actor(&self, units: &Combatants) -> Option<BattlerId> {
        let index = self.actor_index?;
        units.party.roster.members().nth(index).map(|b| b.id)
    }

    /// Fills the actor's current action slot.
    pub fn input_action(
        &mut self,
        units: &mut Combatants,
        item: ActionItem,
        target_index: Option<u8>,
    ) -> Result<(), CommandError> {
        self.expect_phase(Phase::Input)?;
        let id = self
            .actor(units)
            .ok_or(CommandError::NoInputtingActor)?;
        let action = units
            .battler_mut(id)
            .and_then(Battler::inputting_action_mut)
            .ok_or(CommandError::NoInputtingActor)?;
        action.item = Some(item);
        action.target_index = target_index;
        Ok(())
    }

    /// Moves input to the next action slot or actor; starts the turn after the last one.
    pub fn select_next_command(&mut self, ctx: &mut BattleContext<'_>) -> Result<(), CommandError> {
        self.expect_phase(Phase::Input)?;
        loop {
            let advanced = self
                .actor(ctx.units)
                .and_then(|id| ctx.units.battler_mut(id))
                .is_some_and(Battler::select_next_command);
            if !advanced {
                let next = self.actor_index.map_or(0, |index| index + 1);
                self.change_actor(ctx.units, Some(next), ActionState::Waiting);
                if next >= ctx.units.party.roster.size() {
                    self.start_turn(ctx);
                    return Ok(());
                }
            }
            if self.actor_can_input(ctx.units) {
                return Ok(());
            }
        }
    }

    /// Moves input back one slot or actor; returns to party commands before the first.
    pub fn select_previous_command(
        &mut self,
        ctx: &mut BattleContext<'_>,
    ) -> Result<(), CommandError> {
        self.expect_phase(Phase::Input)?;
        loop {
            let moved = self
                .actor(ctx.units)
                .and_then(|id| ctx.units.battler_mut(id))
                .is_some_and(Battler::select_previous_command);
            if !moved {
                match self.actor_index {
                    Some(index) if index > 0 => {
                        self.change_actor(ctx.units, Some(index - 1), ActionState::Undecided);
                    }
                    _ => {
                        self.change_actor(ctx.units, None, ActionState::Undecided);
                        return Ok(());
                    }
                }
            }
            if self.actor_can_input(ctx.units) {
                return Ok(());
            }
        }
    }

    fn actor_can_input(&self, units: &Combatants) -> bool {
        self.actor(units)
            .and_then(|id| units.battler(id))
            .is_some_and(Battler::can_input)
    }

    pub(super) fn change_actor(
        &mut self,
        units: &mut Combatants,
        index: Option<usize>,
        last_state: ActionState,
    ) {
        let last = self.actor(units);
        self.actor_index = index;
        let next = self.actor(units);
        if let Some(battler) = last.and_then(|id| units.battler_mut(id)) {
            battler.action_state = last_state;
        }
        if let Some(battler) = next.and_then(|id| units.battler_mut(id)) {
            battler.action_state = ActionState::Inputting;
        }
    }

    /// Makes `battler` act immediately with the action already queued on it.
    ///
    /// The battler leaves the round queue so it does not act twice. The
    /// interrupted phase resumes once the forced action ends.
    pub fn force_action(
        &mut self,
        ctx: &mut BattleContext<'_>,
        battler: BattlerId,
    ) -> Result<(), CommandError> {
        let target = ctx
            .units
            .battler(battler)
            .ok_or(CommandError::UnknownBattler(battler))?;
        if !target.is_alive() {
            return Err(CommandError::BattlerCannotAct(battler));
        }
        self.forced_battler = Some(battler);
        self.action_battlers.retain(|&id| id != battler);
        debug!(%battler, "action forced");
        Ok(())
    }

    /// Attempts to flee. Only valid while the party is choosing commands.
    ///
    /// Success moves to [`Phase::Aborting`]. Failure raises the escape ratio,
    /// clears the party's actions and runs the round with the troop's
    /// actions as chosen.
    pub fn process_escape(&mut self, ctx: &mut BattleContext<'_>) -> Result<bool, CommandError> {
        self.expect_phase(Phase::Input)?;
        if !self.options.can_escape {
            return Err(CommandError::EscapeForbidden);
        }
        for battler in ctx.units.party.roster.members_mut() {
            if battler.can_move() {
                battler.motion.insert(MotionRequest::ESCAPE);
            }
        }

        let ratio = self.escape.ratio();
        let success = self
            .escape
            .attempt(self.encounter.preemptive, &self.config, self.rng.as_mut());
        info!(success, ratio, "escape attempted");
        ctx.publish(BattleEvent::EscapeAttempted { success, ratio });

        if success {
            self.escaped = true;
            self.fled = true;
            self.set_phase(ctx, Phase::Aborting);
        } else {
            ctx.units.party.roster.clear_actions();
            self.start_turn(ctx);
        }
        Ok(success)
    }

    /// Requests the battle to stop; it ends on the next tick.
    pub fn abort(&mut self, ctx: &mut BattleContext<'_>) {
        if matches!(self.phase, Phase::BattleEnd | Phase::Finished) {
            return;
        }
        self.set_phase(ctx, Phase::Aborting);
    }

    /// Scripted events reserved by actions since the last call.
    pub fn take_reserved_events(&mut self) -> Vec<EventId> {
        std::mem::take(&mut self.reserved_events)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn encounter(&self) -> Encounter {
        self.encounter
    }

    pub fn is_inputting(&self) -> bool {
        self.phase == Phase::Input
    }

    /// Picking the next subject. False while an action is being applied.
    pub fn is_in_turn(&self) -> bool {
        self.phase == Phase::Turn
    }

    pub fn is_turn_end(&self) -> bool {
        self.phase == Phase::TurnEnd
    }

    pub fn is_aborting(&self) -> bool {
        self.phase == Phase::Aborting
    }

    pub fn is_battle_end(&self) -> bool {
        self.phase == Phase::BattleEnd
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn can_escape(&self) -> bool {
        self.options.can_escape
    }

    pub fn can_lose(&self) -> bool {
        self.options.can_lose
    }

    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    pub fn escape_ratio(&self) -> f64 {
        self.escape.ratio()
    }

    pub fn is_forced_turn(&self) -> bool {
        self.turn_forced
    }

    pub fn subject(&self) -> Option<BattlerId> {
        self.subject
    }

    pub fn current_action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Remaining targets of the current action, repeats included.
    pub fn targets(&self) -> impl Iterator<Item = BattlerId> + '_ {
        self.targets.iter().copied()
    }

    /// Battlers still waiting for their turn this round, in order.
    pub fn action_order(&self) -> impl Iterator<Item = BattlerId> + '_ {
        self.action_battlers.iter().copied()
    }

    /// Rewards computed at the victory transition.
    pub fn rewards(&self) -> Option<&Rewards> {
        self.rewards.as_ref()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn expect_phase(&self, expected: Phase) -> Result<(), CommandError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CommandError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    pub(super) fn set_phase(&mut self, ctx: &mut BattleContext<'_>, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        debug!(%from, %to, "phase changed");
        ctx.publish(BattleEvent::PhaseChanged { from, to });
    }
}
