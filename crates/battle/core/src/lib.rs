//! Deterministic turn-based battle engine.
//!
//! `battle-core` holds the rules of a battle: the phase state machine in
//! [`engine::BattleSession`], turn ordering, the per-target action resolution
//! chain (counter, reflection, substitution), escape odds and victory
//! rewards. It performs no I/O. Presentation, content loading and input are
//! supplied by the host through [`engine::BattleHost`],
//! [`env::CatalogOracle`] and the session's command methods, and all
//! randomness comes from an injected [`env::BattleRng`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod state;

pub use action::{
    Action, ActionError, ActionItem, ActionPattern, ActionResult, DamageFormula, DamageKind,
    DamageSpec, HitType, ItemDef, ItemEffect, PatternCondition, Scope, SkillDef, Usable,
};
pub use config::{BattleConfig, BattleOptions};
pub use engine::{
    BattleContext, BattleHost, BattleOutcome, BattleSession, BusyFlags, Encounter, Phase,
    RecordingHost, Rewards,
};
pub use env::{
    ActorDef, BattleRng, Catalog, CatalogOracle, DropItem, EnemyDef, PcgRng, SequenceRng,
    TroopDef, TroopMember,
};
pub use error::{BattleError, CommandError, ErrorSeverity, SetupError};
pub use event::{BattleEvent, EventLog};
pub use state::{
    ActorId, Battler, BattlerId, Combatants, EnemyId, EventId, ItemId, Params, Party,
    PartyAbility, Rates, Side, SkillId, SpecialFlags, StatusKind, Troop, TroopId,
};
