//! Action domain: what a battler intends to do and how it lands.
//!
//! # Module Structure
//!
//! - `item`: skill/item definitions and their usable part (scope, hit type, damage, effects)
//! - `types`: [`Action`], one queued intent of a battler
//! - `validate`: usability checks run when the action's turn comes, and cost payment
//! - `targeting`: scope resolution into a concrete target list
//! - `apply`: hit test, damage and effects against one target
//! - `ai`: computer action selection
mod ai;
mod apply;
mod error;
mod item;
mod targeting;
mod types;
mod validate;

pub use ai::{ActionPattern, PatternCondition, make_auto_battle_actions, make_enemy_actions};
pub use apply::{ActionResult, apply, global_events, item_cnt, item_mrf};
pub use error::ActionError;
pub use item::{
    ActionItem, DamageFormula, DamageKind, DamageSpec, HitType, ItemDef, ItemEffect, Scope,
    SkillDef, Usable,
};
pub use targeting::make_targets;
pub use types::Action;
pub use validate::{pay_cost, validate};
