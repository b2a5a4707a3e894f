//! Data-driven battle content and loaders.
//!
//! This crate ships the default battle database and loads RON/TOML data files:
//! - Skills, items, enemies, actors and troops (RON)
//! - Battle rules (`BattleConfig`, TOML)
//!
//! Content is consumed through `battle_core::CatalogOracle` and never appears
//! in battle state.

use std::path::PathBuf;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorTable, CatalogLoader, CatalogTables, ConfigLoader, ContentFactory, EnemyTable, ItemTable,
    LoadResult, SkillTable, TroopTable,
};

/// Directory holding the data files shipped with this crate.
pub fn shipped_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
