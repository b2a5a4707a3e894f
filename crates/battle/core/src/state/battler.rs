//! Per-combatant battle state.
//!
//! A [`Battler`] is owned by its party or troop roster, never by the
//! session. The session refers to battlers through [`BattlerId`] and
//! mutates them through the roster while it resolves actions.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use super::{
    ActionState, ActorId, AutoRemoval, BattlerId, EnemyId, ExpCurve, MotionRequest, Params,
    PartyAbility, Rates, SpecialFlags, StatusEffects, StatusKind,
};
use crate::action::{Action, ActionItem, ActionResult};
use crate::config::BattleConfig;
use crate::env::{ActorDef, EnemyDef};

/// Side-specific data of a battler.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Actor(ActorProfile),
    Enemy(EnemyProfile),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorProfile {
    pub actor_id: ActorId,
    pub level: u32,
    /// Total experience earned so far.
    pub exp: u32,
    pub exp_curve: ExpCurve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    pub enemy_id: EnemyId,
}

/// Copy of the stats an action reads from its subject.
///
/// Taken before the action is applied so the subject can be borrowed again
/// (reflection applies the action to the subject itself).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubjectStats {
    pub id: BattlerId,
    pub params: Params,
    pub rates: Rates,
}

/// HP/MP changed by end-of-turn regeneration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Regeneration {
    pub hp: i32,
    pub mp: i32,
}

impl Regeneration {
    pub const fn is_empty(&self) -> bool {
        self.hp == 0 && self.mp == 0
    }
}

pub type ExpiredStatuses = ArrayVec<StatusKind, { BattleConfig::MAX_STATUS_EFFECTS }>;

/// A combatant, ally or enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battler {
    pub id: BattlerId,
    pub name: String,
    pub role: Role,

    // ===== stats =====
    pub params: Params,
    pub rates: Rates,
    pub flags: SpecialFlags,
    pub abilities: PartyAbility,
    hp: i32,
    mp: i32,
    pub statuses: StatusEffects,

    // ===== turn state =====
    actions: VecDeque<Action>,
    /// Action slots created per turn.
    pub num_actions: u8,
    action_input_index: usize,
    speed: i32,
    last_target: Option<BattlerId>,

    // ===== presentation =====
    pub action_state: ActionState,
    pub motion: MotionRequest,
    /// Result of the last action applied to this battler.
    pub result: Option<ActionResult>,

    /// Hidden enemies are neither alive nor dead until they appear.
    pub hidden: bool,
    pub battle_member: bool,
}

impl Battler {
    pub fn from_actor(id: BattlerId, def: &ActorDef) -> Self {
        let profile = ActorProfile {
            actor_id: def.id,
            level: def.level.max(1),
            exp: def.exp_curve.exp_for_level(def.level.max(1)),
            exp_curve: def.exp_curve,
        };
        Self::new(id, def.name.clone(), Role::Actor(profile), def.params)
            .with_rates(def.rates)
            .with_flags(def.flags)
            .with_abilities(def.abilities)
            .with_num_actions(def.num_actions)
    }

    pub fn from_enemy(id: BattlerId, def: &EnemyDef, hidden: bool) -> Self {
        let mut battler = Self::new(
            id,
            def.name.clone(),
            Role::Enemy(EnemyProfile { enemy_id: def.id }),
            def.params,
        )
        .with_rates(def.rates)
        .with_flags(def.flags)
        .with_num_actions(def.num_actions);
        battler.hidden = hidden;
        battler
    }

    /// Creates a battler at full HP/MP.
    pub fn new(id: BattlerId, name: impl Into<String>, role: Role, params: Params) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            params,
            rates: Rates::default(),
            flags: SpecialFlags::empty(),
            abilities: PartyAbility::empty(),
            hp: params.mhp.max(0),
            mp: params.mmp.max(0),
            statuses: StatusEffects::new(),
            actions: VecDeque::new(),
            num_actions: 1,
            action_input_index: 0,
            speed: 0,
            last_target: None,
            action_state: ActionState::Undecided,
            motion: MotionRequest::empty(),
            result: None,
            hidden: false,
            battle_member: true,
        }
    }

    pub fn with_rates(mut self, rates: Rates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_flags(mut self, flags: SpecialFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_abilities(mut self, abilities: PartyAbility) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_num_actions(mut self, num_actions: u8) -> Self {
        self.num_actions = num_actions.clamp(1, BattleConfig::MAX_ACTIONS_PER_TURN as u8);
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.set_hp(hp);
        self
    }

    // ========================================================================
    // Life state
    // ========================================================================

    #[inline]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    #[inline]
    pub fn mp(&self) -> i32 {
        self.mp
    }

    pub fn is_actor(&self) -> bool {
        matches!(self.role, Role::Actor(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.role, Role::Enemy(_))
    }

    pub fn is_appeared(&self) -> bool {
        !self.hidden
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.is_appeared() && self.hp > 0
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.is_appeared() && self.hp == 0
    }

    /// Alive with HP below `ratio` of max HP.
    pub fn is_dying(&self, ratio: f64) -> bool {
        self.is_alive() && f64::from(self.hp) < f64::from(self.params.mhp) * ratio
    }

    pub fn can_move(&self) -> bool {
        self.is_alive() && !self.statuses.restricts_movement()
    }

    pub fn is_auto_battle(&self) -> bool {
        self.flags.contains(SpecialFlags::AUTO_BATTLE)
    }

    /// Whether the player chooses this battler's commands.
    pub fn can_input(&self) -> bool {
        self.is_actor() && self.can_move() && !self.is_auto_battle()
    }

    pub fn is_substitute(&self) -> bool {
        self.flags.contains(SpecialFlags::SUBSTITUTE) && self.can_move()
    }

    pub fn is_guard(&self) -> bool {
        self.statuses.contains(StatusKind::Guard) && self.can_move()
    }

    /// Sets HP clamped to `0..=mhp`. Reaching zero clears statuses and actions.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.params.mhp.max(0));
        if self.hp == 0 {
            self.die();
        }
    }

    pub fn set_mp(&mut self, mp: i32) {
        self.mp = mp.clamp(0, self.params.mmp.max(0));
    }

    pub fn gain_hp(&mut self, value: i32) {
        self.set_hp(self.hp.saturating_add(value));
    }

    pub fn gain_mp(&mut self, value: i32) {
        self.set_mp(self.mp.saturating_add(value));
    }

    fn die(&mut self) {
        self.statuses.clear();
        self.actions.clear();
        self.motion.insert(MotionRequest::COLLAPSE);
    }

    /// Brings a dead battler back with 1 HP.
    pub fn revive(&mut self) {
        if self.hp == 0 {
            self.hp = 1;
            self.motion.insert(MotionRequest::REFRESH);
        }
    }

    /// Makes a hidden enemy join the battle.
    pub fn appear(&mut self) {
        self.hidden = false;
    }

    pub fn snapshot(&self) -> SubjectStats {
        SubjectStats {
            id: self.id,
            params: self.params,
            rates: self.rates,
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Replaces the queued actions with `num_actions` empty slots.
    ///
    /// Battlers that cannot move get no slots.
    pub fn make_actions(&mut self) {
        self.clear_actions();
        if !self.can_move() {
            self.action_state = ActionState::Waiting;
            return;
        }
        for _ in 0..self.num_actions {
            self.actions.push_back(Action::new(self.id));
        }
        self.action_state = if self.can_input() {
            ActionState::Undecided
        } else {
            ActionState::Waiting
        };
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.actions.iter()
    }

    pub fn actions_mut(&mut self) -> impl Iterator<Item = &mut Action> + '_ {
        self.actions.iter_mut()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn current_action(&self) -> Option<&Action> {
        self.actions.front()
    }

    pub fn remove_current_action(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
        self.action_input_index = 0;
    }

    /// Replaces all queued actions with a single forced one.
    pub fn force_action(&mut self, item: ActionItem, target_index: Option<u8>) {
        self.clear_actions();
        self.actions
            .push_back(Action::forced(self.id, item, target_index));
    }

    pub fn action_input_index(&self) -> usize {
        self.action_input_index
    }

    /// The slot currently being filled by player input.
    pub fn inputting_action_mut(&mut self) -> Option<&mut Action> {
        self.actions.get_mut(self.action_input_index)
    }

    /// Moves the input cursor to the next slot. Returns false on the last slot.
    pub fn select_next_command(&mut self) -> bool {
        if self.action_input_index + 1 < self.actions.len() {
            self.action_input_index += 1;
            true
        } else {
            false
        }
    }

    /// Moves the input cursor back. Returns false on the first slot.
    pub fn select_previous_command(&mut self) -> bool {
        if self.action_input_index > 0 {
            self.action_input_index -= 1;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    pub fn last_target(&self) -> Option<BattlerId> {
        self.last_target
    }

    pub fn set_last_target(&mut self, target: BattlerId) {
        self.last_target = Some(target);
    }

    // ========================================================================
    // Turn lifecycle
    // ========================================================================

    pub fn on_battle_start(&mut self) {
        self.action_state = ActionState::Undecided;
        self.motion = MotionRequest::empty();
        self.result = None;
    }

    /// Called once the battler has no actions left this turn.
    pub fn on_all_actions_end(&mut self) -> ExpiredStatuses {
        self.result = None;
        self.action_state = ActionState::Done;
        self.statuses.tick(AutoRemoval::ActionEnd)
    }

    /// Regenerates, then counts down turn-based statuses unless the turn was forced.
    pub fn on_turn_end(&mut self, forced_turn: bool) -> (Regeneration, ExpiredStatuses) {
        self.result = None;
        let regen = self.regenerate();
        let expired = if forced_turn {
            ExpiredStatuses::new()
        } else {
            self.statuses.tick(AutoRemoval::TurnEnd)
        };
        (regen, expired)
    }

    /// Regeneration never kills: HP loss is capped at `hp - 1`.
    fn regenerate(&mut self) -> Regeneration {
        if !self.is_alive() {
            return Regeneration::default();
        }
        let hrg = self.rates.hrg + self.statuses.hp_regen_rate();
        let hp = (f64::from(self.params.mhp) * hrg).floor() as i32;
        let hp = hp.max(-(self.hp - 1).max(0));
        let mp = (f64::from(self.params.mmp) * self.rates.mrg).floor() as i32;
        if hp != 0 {
            self.gain_hp(hp);
        }
        if mp != 0 {
            self.gain_mp(mp);
        }
        Regeneration { hp, mp }
    }

    /// Drops every battle-only status and pending action.
    pub fn on_battle_end(&mut self) {
        self.result = None;
        self.statuses.clear();
        self.clear_actions();
        self.action_state = ActionState::Undecided;
    }
}
