#![allow(dead_code)]

use battle_core::state::ExpCurve;
use battle_core::{
    ActionItem, ActionPattern, ActorDef, ActorId, BattleConfig, BattleContext, BattleEvent,
    BattleOptions, BattleRng, BattleSession, BattlerId, Catalog, Combatants, DamageFormula,
    DamageKind, DamageSpec, DropItem, EnemyDef, EnemyId, Encounter, HitType, ItemDef, ItemEffect,
    ItemId, Params, Party, PartyAbility, PatternCondition, Phase, Rates, RecordingHost, Scope,
    SkillDef, SkillId, SpecialFlags, StatusKind, Troop, TroopDef, TroopId, TroopMember, Usable,
};

pub const ATTACK: SkillId = SkillId(1);
pub const GUARD: SkillId = SkillId(2);
pub const FIRE: SkillId = SkillId(3);
pub const POTION: ItemId = ItemId(1);

pub const HERO: ActorId = ActorId(1);
pub const KNIGHT: ActorId = ActorId(2);

pub const SLIME: EnemyId = EnemyId(1);
pub const GOLEM: EnemyId = EnemyId(2);

pub const SLIME_PAIR: TroopId = TroopId(2);

/// Rates that never consume a random draw.
pub fn certain_rates() -> Rates {
    Rates {
        hit: 1.0,
        eva: 0.0,
        cri: 0.0,
        cev: 0.0,
        mev: 0.0,
        mrf: 0.0,
        cnt: 0.0,
        hrg: 0.0,
        mrg: 0.0,
        tgr: 1.0,
        grd: 1.0,
        rec: 1.0,
        exr: 1.0,
    }
}

fn damage(kind: DamageKind, formula: DamageFormula, critical: bool) -> DamageSpec {
    DamageSpec {
        kind,
        formula,
        variance: 0,
        critical,
    }
}

pub fn hero_def() -> ActorDef {
    ActorDef {
        id: HERO,
        name: "Hero".into(),
        level: 1,
        params: Params::new(100, 20, 20, 10, 10, 10, 10, 10),
        rates: certain_rates(),
        flags: SpecialFlags::empty(),
        abilities: PartyAbility::empty(),
        exp_curve: ExpCurve::DEFAULT,
        num_actions: 1,
    }
}

pub fn knight_def() -> ActorDef {
    ActorDef {
        id: KNIGHT,
        name: "Knight".into(),
        params: Params::new(200, 0, 15, 30, 0, 10, 4, 5),
        flags: SpecialFlags::SUBSTITUTE,
        ..hero_def()
    }
}

/// Slime: 30 HP, dies to a single attack from the hero.
pub fn slime_def() -> EnemyDef {
    EnemyDef {
        id: SLIME,
        name: "Slime".into(),
        params: Params::new(30, 0, 10, 5, 5, 5, 5, 5),
        rates: certain_rates(),
        flags: SpecialFlags::empty(),
        exp: 10,
        gold: 20,
        drops: vec![DropItem {
            item: POTION,
            denominator: 2,
        }],
        patterns: vec![ActionPattern {
            skill: ATTACK,
            rating: 5,
            condition: PatternCondition::Always,
        }],
        num_actions: 1,
    }
}

/// Golem: survives several hits, so rounds can be observed end to end.
pub fn golem_def() -> EnemyDef {
    EnemyDef {
        id: GOLEM,
        name: "Golem".into(),
        params: Params::new(500, 0, 10, 5, 5, 5, 5, 5),
        exp: 60,
        gold: 100,
        drops: Vec::new(),
        ..slime_def()
    }
}

pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .insert_skill(SkillDef {
            id: ATTACK,
            mp_cost: 0,
            usable: Usable::new("Attack", Scope::OneEnemy, HitType::Physical).with_damage(
                damage(DamageKind::HpDamage, DamageFormula::ATTACK, true),
            ),
        })
        .insert_skill(SkillDef {
            id: GUARD,
            mp_cost: 0,
            usable: Usable::new("Guard", Scope::User, HitType::CertainHit)
                .with_speed(2000)
                .with_effect(ItemEffect::AddStatus {
                    status: StatusKind::Guard,
                    chance: 1.0,
                }),
        })
        .insert_skill(SkillDef {
            id: FIRE,
            mp_cost: 5,
            usable: Usable::new("Fire", Scope::OneEnemy, HitType::Magical).with_damage(damage(
                DamageKind::HpDamage,
                DamageFormula {
                    base: 0,
                    atk: 0,
                    mat: 4,
                    def: 0,
                    mdf: 2,
                },
                false,
            )),
        })
        .insert_item(ItemDef {
            id: POTION,
            consumable: true,
            usable: Usable::new("Potion", Scope::OneAlly, HitType::CertainHit).with_effect(
                ItemEffect::RecoverHp {
                    rate: 0.0,
                    flat: 50,
                },
            ),
        })
        .insert_actor(hero_def())
        .insert_actor(knight_def())
        .insert_enemy(slime_def())
        .insert_enemy(golem_def())
        .insert_troop(TroopDef {
            id: TroopId(1),
            name: "Slime".into(),
            members: vec![TroopMember {
                enemy: SLIME,
                hidden: false,
            }],
        })
        .insert_troop(TroopDef {
            id: SLIME_PAIR,
            name: "Slime*2".into(),
            members: vec![
                TroopMember {
                    enemy: SLIME,
                    hidden: false,
                },
                TroopMember {
                    enemy: SLIME,
                    hidden: false,
                },
            ],
        });
    catalog
}

pub fn units(catalog: &Catalog, actors: &[ActorId], troop: TroopId) -> Combatants {
    let party = Party::from_actors(actors, catalog).unwrap();
    let troop = Troop::from_catalog(troop, catalog).unwrap();
    Combatants::new(party, troop)
}

/// Session plus everything it borrows, driven tick by tick.
pub struct Battle {
    pub catalog: Catalog,
    pub units: Combatants,
    pub host: RecordingHost,
    pub session: BattleSession,
}

impl Battle {
    pub fn new(
        catalog: Catalog,
        units: Combatants,
        options: BattleOptions,
        rng: impl BattleRng + 'static,
    ) -> Self {
        let session =
            BattleSession::new(BattleConfig::default(), options, &units, Box::new(rng)).unwrap();
        Self {
            catalog,
            units,
            host: RecordingHost::new(),
            session,
        }
    }

    /// Sets the encounter advantage and enters the start phase.
    pub fn start(&mut self, encounter: Encounter) {
        self.session.set_encounter(encounter);
        self.with_ctx(|session, ctx| session.start_battle(ctx))
            .unwrap();
    }

    pub fn with_ctx<R>(
        &mut self,
        f: impl FnOnce(&mut BattleSession, &mut BattleContext<'_>) -> R,
    ) -> R {
        let mut ctx = BattleContext::new(&mut self.units, &self.catalog, &mut self.host);
        f(&mut self.session, &mut ctx)
    }

    pub fn tick(&mut self) {
        self.with_ctx(|session, ctx| session.update(ctx));
    }

    /// Ticks until `done` holds. Panics after `max_ticks`.
    pub fn run_until(&mut self, max_ticks: usize, done: impl Fn(&BattleSession) -> bool) {
        for _ in 0..max_ticks {
            if done(&self.session) {
                return;
            }
            self.tick();
        }
        assert!(done(&self.session), "condition not reached in {max_ticks} ticks");
    }

    pub fn run_to_phase(&mut self, phase: Phase) {
        self.run_until(64, |session| session.phase() == phase);
    }

    /// Commands every battle member with `item` against `target_index` and starts the turn.
    pub fn input_all(&mut self, item: ActionItem, target_index: Option<u8>) {
        assert_eq!(self.session.phase(), Phase::Input);
        self.with_ctx(|session, ctx| session.select_next_command(ctx))
            .unwrap();
        while self.session.phase() == Phase::Input {
            self.session
                .input_action(&mut self.units, item, target_index)
                .unwrap();
            self.with_ctx(|session, ctx| session.select_next_command(ctx))
                .unwrap();
        }
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.host.events()
    }

    pub fn action_subjects(&self) -> Vec<BattlerId> {
        self.events()
            .iter()
            .filter_map(|event| match event {
                BattleEvent::ActionStarted { subject, .. } => Some(*subject),
                _ => None,
            })
            .collect()
    }
}
