use std::collections::HashMap;

use crate::action::{ActionItem, ActionPattern, ItemDef, SkillDef, Usable};
use crate::state::{
    ActorId, EnemyId, ExpCurve, ItemId, Params, PartyAbility, Rates, SkillId, SpecialFlags,
    TroopId,
};

/// Read-only database of everything a battle can reference.
pub trait CatalogOracle {
    fn skill(&self, id: SkillId) -> Option<&SkillDef>;
    fn item(&self, id: ItemId) -> Option<&ItemDef>;
    fn enemy(&self, id: EnemyId) -> Option<&EnemyDef>;
    fn actor(&self, id: ActorId) -> Option<&ActorDef>;
    fn troop(&self, id: TroopId) -> Option<&TroopDef>;

    /// Resolves the usable part of a skill or item.
    fn usable(&self, item: ActionItem) -> Option<&Usable> {
        match item {
            ActionItem::Skill(id) => self.skill(id).map(|skill| &skill.usable),
            ActionItem::Item(id) => self.item(id).map(|item| &item.usable),
        }
    }
}

/// One entry of an enemy's drop table: dropped with probability `1 / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropItem {
    pub item: ItemId,
    pub denominator: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDef {
    pub id: EnemyId,
    pub name: String,
    pub params: Params,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rates: Rates,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: SpecialFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Vec<DropItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub patterns: Vec<ActionPattern>,
    #[cfg_attr(feature = "serde", serde(default = "default_num_actions"))]
    pub num_actions: u8,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorDef {
    pub id: ActorId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    pub params: Params,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rates: Rates,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: SpecialFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: PartyAbility,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exp_curve: ExpCurve,
    #[cfg_attr(feature = "serde", serde(default = "default_num_actions"))]
    pub num_actions: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TroopMember {
    pub enemy: EnemyId,
    /// Hidden members take no part in the battle until they appear.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TroopDef {
    pub id: TroopId,
    pub name: String,
    pub members: Vec<TroopMember>,
}

#[cfg(feature = "serde")]
fn default_num_actions() -> u8 {
    1
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

/// In-memory catalog keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    skills: HashMap<SkillId, SkillDef>,
    items: HashMap<ItemId, ItemDef>,
    enemies: HashMap<EnemyId, EnemyDef>,
    actors: HashMap<ActorId, ActorDef>,
    troops: HashMap<TroopId, TroopDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_skill(&mut self, skill: SkillDef) -> &mut Self {
        self.skills.insert(skill.id, skill);
        self
    }

    pub fn insert_item(&mut self, item: ItemDef) -> &mut Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn insert_enemy(&mut self, enemy: EnemyDef) -> &mut Self {
        self.enemies.insert(enemy.id, enemy);
        self
    }

    pub fn insert_actor(&mut self, actor: ActorDef) -> &mut Self {
        self.actors.insert(actor.id, actor);
        self
    }

    pub fn insert_troop(&mut self, troop: TroopDef) -> &mut Self {
        self.troops.insert(troop.id, troop);
        self
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn troop_ids(&self) -> impl Iterator<Item = TroopId> + '_ {
        self.troops.keys().copied()
    }
}

impl CatalogOracle for Catalog {
    fn skill(&self, id: SkillId) -> Option<&SkillDef> {
        self.skills.get(&id)
    }

    fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(&id)
    }

    fn enemy(&self, id: EnemyId) -> Option<&EnemyDef> {
        self.enemies.get(&id)
    }

    fn actor(&self, id: ActorId) -> Option<&ActorDef> {
        self.actors.get(&id)
    }

    fn troop(&self, id: TroopId) -> Option<&TroopDef> {
        self.troops.get(&id)
    }
}
