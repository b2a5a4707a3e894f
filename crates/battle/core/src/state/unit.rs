//! Party and troop rosters.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::{ActorId, Battler, BattlerId, ItemId, PartyAbility, Role, Side, TroopId};
use crate::config::BattleConfig;
use crate::env::{BattleRng, CatalogOracle};
use crate::error::SetupError;

pub type Members = ArrayVec<Battler, { BattleConfig::MAX_UNIT_MEMBERS }>;

/// The members of one side. Slot indices are the `index` of each [`BattlerId`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    side: Side,
    members: Members,
}

impl Roster {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            members: ArrayVec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Appends a battler, assigning it the next slot id.
    pub fn push(&mut self, mut battler: Battler) -> Result<BattlerId, SetupError> {
        let id = BattlerId::new(self.side, self.members.len() as u8);
        battler.id = id;
        self.members
            .try_push(battler)
            .map_err(|_| SetupError::TooManyMembers {
                side: self.side,
                max: BattleConfig::MAX_UNIT_MEMBERS,
            })?;
        Ok(id)
    }

    pub fn get(&self, slot: usize) -> Option<&Battler> {
        self.members.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Battler> {
        self.members.get_mut(slot)
    }

    pub fn all(&self) -> &[Battler] {
        &self.members
    }

    pub fn all_mut(&mut self) -> &mut [Battler] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members taking part in the battle (reserves and hidden enemies excluded).
    pub fn members(&self) -> impl Iterator<Item = &Battler> + '_ {
        self.members
            .iter()
            .filter(|battler| battler.battle_member && battler.is_appeared())
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut Battler> + '_ {
        self.members
            .iter_mut()
            .filter(|battler| battler.battle_member && battler.is_appeared())
    }

    pub fn member_ids(&self) -> Vec<BattlerId> {
        self.members().map(|battler| battler.id).collect()
    }

    pub fn alive_members(&self) -> impl Iterator<Item = &Battler> + '_ {
        self.members().filter(|battler| battler.is_alive())
    }

    pub fn dead_members(&self) -> impl Iterator<Item = &Battler> + '_ {
        self.members().filter(|battler| battler.is_dead())
    }

    pub fn size(&self) -> usize {
        self.members().count()
    }

    pub fn is_all_dead(&self) -> bool {
        self.alive_members().next().is_none()
    }

    /// Sum of the agility of all battle members.
    pub fn agility_sum(&self) -> i32 {
        self.members().map(|battler| battler.params.agi).sum()
    }

    /// Average agility of the battle members, `0` when there are none.
    pub fn agility(&self) -> i32 {
        let size = self.size() as i32;
        if size == 0 {
            0
        } else {
            self.agility_sum() / size
        }
    }

    /// Picks a living member, weighted by target rate.
    pub fn random_target(&self, rng: &mut dyn BattleRng) -> Option<BattlerId> {
        let tgr_sum: f64 = self.alive_members().map(|b| b.rates.tgr).sum();
        let mut tgr_rand = rng.random() * tgr_sum;
        let mut target = None;
        for battler in self.alive_members() {
            tgr_rand -= battler.rates.tgr;
            if tgr_rand <= 0.0 && target.is_none() {
                target = Some(battler.id);
            }
        }
        target
    }

    pub fn random_dead_target(&self, rng: &mut dyn BattleRng) -> Option<BattlerId> {
        let dead: Vec<BattlerId> = self.dead_members().map(|b| b.id).collect();
        if dead.is_empty() {
            return None;
        }
        let index = rng.random_int(dead.len() as i32) as usize;
        dead.get(index).copied()
    }

    /// The member at `index` if alive, else the first living member.
    pub fn smooth_target(&self, index: u8) -> Option<BattlerId> {
        match self.members().nth(usize::from(index)) {
            Some(battler) if battler.is_alive() => Some(battler.id),
            _ => self.alive_members().next().map(|b| b.id),
        }
    }

    /// The member at `index` if dead, else the first dead member.
    pub fn smooth_dead_target(&self, index: u8) -> Option<BattlerId> {
        match self.members().nth(usize::from(index)) {
            Some(battler) if battler.is_dead() => Some(battler.id),
            _ => self.dead_members().next().map(|b| b.id),
        }
    }

    /// First member able to cover for dying allies.
    pub fn substitute_battler(&self) -> Option<BattlerId> {
        self.members()
            .find(|battler| battler.is_substitute())
            .map(|battler| battler.id)
    }

    pub fn can_input(&self) -> bool {
        self.members().any(Battler::can_input)
    }

    pub fn clear_actions(&mut self) {
        for battler in self.members_mut() {
            battler.clear_actions();
        }
    }
}

/// The player side: actors plus the shared purse and inventory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    pub roster: Roster,
    pub gold: u32,
    pub inventory: BTreeMap<ItemId, u32>,
}

impl Party {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(Side::Party),
            gold: 0,
            inventory: BTreeMap::new(),
        }
    }

    /// Builds a party from catalog actors. Members past the battle limit are reserves.
    pub fn from_actors(
        actors: &[ActorId],
        catalog: &dyn CatalogOracle,
    ) -> Result<Self, SetupError> {
        let mut party = Self::new();
        for &actor_id in actors {
            let def = catalog
                .actor(actor_id)
                .ok_or(SetupError::UnknownActor(actor_id))?;
            party.add_member(Battler::from_actor(BattlerId::party(0), def))?;
        }
        Ok(party)
    }

    pub fn add_member(&mut self, mut battler: Battler) -> Result<BattlerId, SetupError> {
        battler.battle_member = self.roster.len() < BattleConfig::MAX_BATTLE_MEMBERS;
        self.roster.push(battler)
    }

    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn has_ability(&self, ability: PartyAbility) -> bool {
        self.roster
            .members()
            .any(|battler| battler.abilities.contains(ability))
    }

    /// Highest level among battle members.
    pub fn highest_level(&self) -> u32 {
        self.roster
            .members()
            .filter_map(|battler| match &battler.role {
                Role::Actor(profile) => Some(profile.level),
                Role::Enemy(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn gain_gold(&mut self, amount: u32, max_gold: u32) {
        self.gold = self.gold.saturating_add(amount).min(max_gold);
    }

    pub fn item_count(&self, item: ItemId) -> u32 {
        self.inventory.get(&item).copied().unwrap_or(0)
    }

    pub fn has_item(&self, item: ItemId) -> bool {
        self.item_count(item) > 0
    }

    pub fn gain_item(&mut self, item: ItemId, amount: u32) {
        *self.inventory.entry(item).or_default() += amount;
    }

    /// Removes one item. Returns false if none was held.
    pub fn consume_item(&mut self, item: ItemId) -> bool {
        match self.inventory.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.inventory.remove(&item);
                }
                true
            }
            _ => false,
        }
    }

    /// Empty parties cannot fight; the battle is aborted.
    pub fn is_empty(&self) -> bool {
        self.roster.size() == 0
    }

    pub fn revive_battle_members(&mut self) {
        for battler in self.roster.members_mut() {
            battler.revive();
        }
    }
}

impl Default for Party {
    fn default() -> Self {
        Self::new()
    }
}

/// The enemy side of a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Troop {
    pub troop_id: TroopId,
    pub roster: Roster,
    turn_count: u32,
}

impl Troop {
    pub fn new(troop_id: TroopId) -> Self {
        Self {
            troop_id,
            roster: Roster::new(Side::Troop),
            turn_count: 0,
        }
    }

    /// Instantiates a troop definition from the catalog.
    pub fn from_catalog(
        troop_id: TroopId,
        catalog: &dyn CatalogOracle,
    ) -> Result<Self, SetupError> {
        let def = catalog
            .troop(troop_id)
            .ok_or(SetupError::UnknownTroop(troop_id))?;
        if def.members.is_empty() {
            return Err(SetupError::EmptyTroop(troop_id));
        }
        let mut troop = Self::new(troop_id);
        for member in &def.members {
            let enemy = catalog.enemy(member.enemy).ok_or(SetupError::UnknownEnemy {
                troop: troop_id,
                enemy: member.enemy,
            })?;
            troop.add_member(Battler::from_enemy(
                BattlerId::troop(0),
                enemy,
                member.hidden,
            ))?;
        }
        Ok(troop)
    }

    pub fn add_member(&mut self, battler: Battler) -> Result<BattlerId, SetupError> {
        self.roster.push(battler)
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn increase_turn(&mut self) {
        self.turn_count += 1;
    }

    /// Distinct names of living enemies, in slot order.
    pub fn enemy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for battler in self.roster.alive_members() {
            if !names.contains(&battler.name) {
                names.push(battler.name.clone());
            }
        }
        names
    }
}

/// Both sides of the battle. Owned by the host, lent to the session per call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatants {
    pub party: Party,
    pub troop: Troop,
}

impl Combatants {
    pub fn new(party: Party, troop: Troop) -> Self {
        Self { party, troop }
    }

    pub fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Party => &self.party.roster,
            Side::Troop => &self.troop.roster,
        }
    }

    pub fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Party => &mut self.party.roster,
            Side::Troop => &mut self.troop.roster,
        }
    }

    pub fn battler(&self, id: BattlerId) -> Option<&Battler> {
        self.roster(id.side).get(id.slot())
    }

    pub fn battler_mut(&mut self, id: BattlerId) -> Option<&mut Battler> {
        self.roster_mut(id.side).get_mut(id.slot())
    }

    /// Battle members of both sides, party first.
    pub fn all_battle_members(&self) -> Vec<BattlerId> {
        let mut ids = self.party.roster.member_ids();
        ids.extend(self.troop.roster.member_ids());
        ids
    }

    pub fn friends_of(&self, id: BattlerId) -> &Roster {
        self.roster(id.side)
    }

    pub fn opponents_of(&self, id: BattlerId) -> &Roster {
        self.roster(id.side.opponent())
    }
}
