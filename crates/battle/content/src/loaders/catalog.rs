//! Battle database loader.
//!
//! One RON file per table. Cross references (troop members, enemy patterns,
//! drops) are checked once every table is read.

use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use battle_core::{ActorDef, Catalog, EnemyDef, ItemDef, SkillDef, TroopDef};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Skill table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTable {
    pub skills: Vec<SkillDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTable {
    pub items: Vec<ItemDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTable {
    pub enemies: Vec<EnemyDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorTable {
    pub actors: Vec<ActorDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TroopTable {
    pub troops: Vec<TroopDef>,
}

/// Every table of the database, before it is indexed.
#[derive(Debug, Clone, Default)]
pub struct CatalogTables {
    pub skills: Vec<SkillDef>,
    pub items: Vec<ItemDef>,
    pub enemies: Vec<EnemyDef>,
    pub actors: Vec<ActorDef>,
    pub troops: Vec<TroopDef>,
}

/// Loader for the battle database from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Reads `skills.ron`, `items.ron`, `enemies.ron`, `actors.ron` and
    /// `troops.ron` from `dir` and checks their references.
    pub fn load_dir(dir: &Path) -> LoadResult<Catalog> {
        let tables = CatalogTables {
            skills: parse::<SkillTable>(&dir.join("skills.ron"), "skill table")?.skills,
            items: parse::<ItemTable>(&dir.join("items.ron"), "item table")?.items,
            enemies: parse::<EnemyTable>(&dir.join("enemies.ron"), "enemy table")?.enemies,
            actors: parse::<ActorTable>(&dir.join("actors.ron"), "actor table")?.actors,
            troops: parse::<TroopTable>(&dir.join("troops.ron"), "troop table")?.troops,
        };
        Self::build(tables)
    }

    /// Validates the tables and indexes them into a [`Catalog`].
    pub fn build(tables: CatalogTables) -> LoadResult<Catalog> {
        Self::validate(&tables)?;
        debug!(
            skills = tables.skills.len(),
            items = tables.items.len(),
            enemies = tables.enemies.len(),
            actors = tables.actors.len(),
            troops = tables.troops.len(),
            "catalog loaded"
        );

        let mut catalog = Catalog::new();
        for skill in tables.skills {
            catalog.insert_skill(skill);
        }
        for item in tables.items {
            catalog.insert_item(item);
        }
        for enemy in tables.enemies {
            catalog.insert_enemy(enemy);
        }
        for actor in tables.actors {
            catalog.insert_actor(actor);
        }
        for troop in tables.troops {
            catalog.insert_troop(troop);
        }
        Ok(catalog)
    }

    /// Rejects duplicate ids and dangling references.
    pub fn validate(tables: &CatalogTables) -> LoadResult<()> {
        let skills = unique_ids("skill", tables.skills.iter().map(|s| s.id))?;
        let items = unique_ids("item", tables.items.iter().map(|i| i.id))?;
        let enemies = unique_ids("enemy", tables.enemies.iter().map(|e| e.id))?;
        unique_ids("actor", tables.actors.iter().map(|a| a.id))?;
        unique_ids("troop", tables.troops.iter().map(|t| t.id))?;

        for enemy in &tables.enemies {
            for pattern in &enemy.patterns {
                if !skills.contains(&pattern.skill) {
                    anyhow::bail!(
                        "Enemy {} ({}) uses unknown {}",
                        enemy.id,
                        enemy.name,
                        pattern.skill
                    );
                }
                if !(1..=9).contains(&pattern.rating) {
                    anyhow::bail!(
                        "Enemy {} ({}) has pattern rating {} outside 1..=9",
                        enemy.id,
                        enemy.name,
                        pattern.rating
                    );
                }
            }
            for drop in &enemy.drops {
                if !items.contains(&drop.item) {
                    anyhow::bail!(
                        "Enemy {} ({}) drops unknown {}",
                        enemy.id,
                        enemy.name,
                        drop.item
                    );
                }
            }
        }

        for troop in &tables.troops {
            if troop.members.is_empty() {
                anyhow::bail!("Troop {} ({}) has no members", troop.id, troop.name);
            }
            for member in &troop.members {
                if !enemies.contains(&member.enemy) {
                    anyhow::bail!(
                        "Troop {} ({}) references unknown {}",
                        troop.id,
                        troop.name,
                        member.enemy
                    );
                }
            }
        }
        Ok(())
    }
}

fn parse<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON {}: {}", what, path.display(), e))
}

fn unique_ids<I>(kind: &str, ids: impl Iterator<Item = I>) -> LoadResult<HashSet<I>>
where
    I: Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if seen.contains(&id) {
            anyhow::bail!("Duplicate {} id: {}", kind, id);
        }
        seen.insert(id);
    }
    Ok(seen)
}
