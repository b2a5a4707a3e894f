//! Content factory for building battles from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use battle_core::{
    ActorId, BattleConfig, Catalog, CatalogOracle, Combatants, Party, Troop, TroopId,
};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── skills.ron
/// ├── items.ron
/// ├── enemies.ron
/// ├── actors.ron
/// └── troops.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        ConfigLoader::load(&path)
    }

    /// Load and cross-check the battle database.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        CatalogLoader::load_dir(&self.data_dir)
    }

    /// Builds both sides of a battle from catalog ids.
    ///
    /// The attack and guard skills named by `config` must exist, since
    /// counters and auto-battle fall back on them.
    pub fn build_combatants(
        &self,
        catalog: &Catalog,
        config: &BattleConfig,
        actors: &[ActorId],
        troop: TroopId,
    ) -> LoadResult<Combatants> {
        for skill in [config.attack_skill, config.guard_skill] {
            if catalog.skill(skill).is_none() {
                anyhow::bail!("Battle config names unknown {}", skill);
            }
        }
        let party = Party::from_actors(actors, catalog).context("Failed to build party")?;
        let troop = Troop::from_catalog(troop, catalog).context("Failed to build troop")?;
        Ok(Combatants::new(party, troop))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
