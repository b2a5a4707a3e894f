//! Read-only collaborators injected into the battle.
//!
//! The catalog exposes skill, item, enemy, actor and troop definitions; the
//! RNG is the single source of randomness. Neither is owned by the session's
//! state, so hosts can swap them for fixtures in tests.
mod catalog;
mod rng;

pub use catalog::{
    ActorDef, Catalog, CatalogOracle, DropItem, EnemyDef, TroopDef, TroopMember,
};
pub use rng::{BattleRng, PcgRng, SequenceRng, roll};
