//! Skill and item definitions consumed by the action pipeline.
//!
//! Definitions are read-only catalog data. Everything that decides how an
//! action lands on a target lives in [`Usable`], shared by skills and items.

use crate::state::{EventId, ItemId, SkillId, StatusKind};

/// Who an action may target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    #[default]
    None,
    OneEnemy,
    AllEnemies,
    /// N picks among living enemies, weighted by target rate, duplicates allowed.
    RandomEnemies(u8),
    OneAlly,
    AllAllies,
    OneDeadAlly,
    AllDeadAllies,
    User,
}

impl Scope {
    pub const fn is_for_opponent(self) -> bool {
        matches!(
            self,
            Scope::OneEnemy | Scope::AllEnemies | Scope::RandomEnemies(_)
        )
    }

    pub const fn is_for_friend(self) -> bool {
        matches!(
            self,
            Scope::OneAlly
                | Scope::AllAllies
                | Scope::OneDeadAlly
                | Scope::AllDeadAllies
                | Scope::User
        )
    }

    pub const fn is_for_dead_friend(self) -> bool {
        matches!(self, Scope::OneDeadAlly | Scope::AllDeadAllies)
    }

    pub const fn is_for_user(self) -> bool {
        matches!(self, Scope::User)
    }

    pub const fn is_for_one(self) -> bool {
        matches!(
            self,
            Scope::OneEnemy | Scope::OneAlly | Scope::OneDeadAlly | Scope::User
        )
    }

    /// True when the player must pick a target index while inputting.
    pub const fn needs_selection(self) -> bool {
        matches!(self, Scope::OneEnemy | Scope::OneAlly | Scope::OneDeadAlly)
    }
}

/// How the hit and evasion tests are performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitType {
    /// Never misses, never evaded, bypasses substitution.
    #[default]
    CertainHit,
    /// Uses the subject's `hit` and the target's `eva`; can be countered.
    Physical,
    /// Uses the target's `mev`; can be reflected.
    Magical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    HpDamage,
    MpDamage,
    HpRecover,
    MpRecover,
    /// HP damage where the subject recovers the amount dealt.
    HpDrain,
}

impl DamageKind {
    pub const fn is_recover(self) -> bool {
        matches!(self, DamageKind::HpRecover | DamageKind::MpRecover)
    }

    pub const fn targets_mp(self) -> bool {
        matches!(self, DamageKind::MpDamage | DamageKind::MpRecover)
    }
}

/// Linear damage formula:
///
/// ```text
/// base + a.atk * atk + a.mat * mat - b.def * def - b.mdf * mdf
/// ```
///
/// where `a` is the subject and `b` the target. The result is clamped at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageFormula {
    pub base: i32,
    pub atk: i32,
    pub mat: i32,
    pub def: i32,
    pub mdf: i32,
}

impl DamageFormula {
    /// The stock attack formula: `a.atk * 4 - b.def * 2`.
    pub const ATTACK: Self = Self {
        base: 0,
        atk: 4,
        mat: 0,
        def: 2,
        mdf: 0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageSpec {
    pub kind: DamageKind,
    pub formula: DamageFormula,
    /// Variance in percent of the computed value.
    pub variance: u8,
    /// Whether the action can land critical hits.
    pub critical: bool,
}

/// Secondary effects applied after the damage step when the action hits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    RecoverHp { rate: f64, flat: i32 },
    RecoverMp { rate: f64, flat: i32 },
    AddStatus { status: StatusKind, chance: f64 },
    RemoveStatus(StatusKind),
    /// Global effect: reserves a scripted event once per action, whatever the target count.
    ReserveEvent(EventId),
}

impl ItemEffect {
    pub const fn is_global(&self) -> bool {
        matches!(self, ItemEffect::ReserveEvent(_))
    }
}

/// The part of a skill or item that drives targeting and application.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Usable {
    pub name: String,
    pub scope: Scope,
    pub hit_type: HitType,
    /// How many times each resolved target is hit.
    #[cfg_attr(feature = "serde", serde(default = "default_repeats"))]
    pub repeats: u8,
    #[cfg_attr(feature = "serde", serde(default = "default_success_rate"))]
    pub success_rate: f64,
    /// Added to the subject's speed roll for turn order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<DamageSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<ItemEffect>,
}

#[cfg(feature = "serde")]
fn default_repeats() -> u8 {
    1
}

#[cfg(feature = "serde")]
fn default_success_rate() -> f64 {
    1.0
}

impl Usable {
    pub fn new(name: impl Into<String>, scope: Scope, hit_type: HitType) -> Self {
        Self {
            name: name.into(),
            scope,
            hit_type,
            repeats: 1,
            success_rate: 1.0,
            speed: 0,
            damage: None,
            effects: Vec::new(),
        }
    }

    pub fn with_damage(mut self, damage: DamageSpec) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_effect(mut self, effect: ItemEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_repeats(mut self, repeats: u8) -> Self {
        self.repeats = repeats.max(1);
        self
    }

    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate;
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub const fn is_certain_hit(&self) -> bool {
        matches!(self.hit_type, HitType::CertainHit)
    }

    pub const fn is_physical(&self) -> bool {
        matches!(self.hit_type, HitType::Physical)
    }

    pub const fn is_magical(&self) -> bool {
        matches!(self.hit_type, HitType::Magical)
    }

    pub fn num_repeats(&self) -> usize {
        usize::from(self.repeats.max(1))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDef {
    pub id: SkillId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mp_cost: i32,
    pub usable: Usable,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDef {
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub consumable: bool,
    pub usable: Usable,
}

/// Reference to the skill or item an action uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionItem {
    Skill(SkillId),
    Item(ItemId),
}

impl core::fmt::Display for ActionItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ActionItem::Skill(id) => id.fmt(f),
            ActionItem::Item(id) => id.fmt(f),
        }
    }
}
