mod common;

use battle_core::{
    ActionItem, BattleEvent, BattleOptions, BattlerId, Catalog, CommandError, Encounter, Phase,
    SequenceRng, TroopDef, TroopId, TroopMember,
};
use common::{ATTACK, Battle, GOLEM, HERO, catalog, units};

const GOLEM_TROOP: TroopId = TroopId(9);

fn hero_vs_golem() -> Battle {
    let mut catalog: Catalog = catalog();
    catalog.insert_troop(TroopDef {
        id: GOLEM_TROOP,
        name: "Golem".into(),
        members: vec![TroopMember {
            enemy: GOLEM,
            hidden: false,
        }],
    });
    let units = units(&catalog, &[HERO], GOLEM_TROOP);
    Battle::new(catalog, units, BattleOptions::new(true, false), SequenceRng::new([]))
}

#[test]
fn forced_battler_acts_immediately_and_only_once() {
    let mut battle = hero_vs_golem();
    battle.start(Encounter::NORMAL);
    battle.tick();
    battle.input_all(ActionItem::Skill(ATTACK), Some(0));
    assert_eq!(
        battle.session.action_order().collect::<Vec<_>>(),
        vec![BattlerId::party(0), BattlerId::troop(0)]
    );

    let golem = BattlerId::troop(0);
    battle
        .units
        .battler_mut(golem)
        .unwrap()
        .force_action(ActionItem::Skill(ATTACK), Some(0));
    battle
        .with_ctx(|session, ctx| session.force_action(ctx, golem))
        .unwrap();
    assert_eq!(
        battle.session.action_order().collect::<Vec<_>>(),
        vec![BattlerId::party(0)]
    );

    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Action);
    assert_eq!(battle.session.subject(), Some(golem));
    assert!(battle.session.is_forced_turn());
    assert!(battle.events().iter().any(|event| matches!(
        event,
        BattleEvent::ActionStarted { subject, forced: true, .. } if *subject == golem
    )));

    // Apply, then resume the interrupted turn with no subject.
    battle.tick();
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Turn);
    assert_eq!(battle.session.subject(), None);

    battle.run_to_phase(Phase::TurnEnd);
    assert_eq!(battle.action_subjects(), vec![golem, BattlerId::party(0)]);
    assert!(!battle.session.is_forced_turn());
}

#[test]
fn forced_action_resumes_the_interrupted_subject() {
    let mut battle = hero_vs_golem();
    battle.start(Encounter::NORMAL);
    battle.tick();
    battle.input_all(ActionItem::Skill(ATTACK), Some(0));

    // Hero starts and lands its attack, then the golem is forced in.
    battle.tick();
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Action);
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Turn);
    assert_eq!(battle.session.subject(), Some(BattlerId::party(0)));

    let golem = BattlerId::troop(0);
    battle
        .units
        .battler_mut(golem)
        .unwrap()
        .force_action(ActionItem::Skill(ATTACK), Some(0));
    battle
        .with_ctx(|session, ctx| session.force_action(ctx, golem))
        .unwrap();

    battle.tick();
    assert_eq!(battle.session.subject(), Some(golem));
    battle.tick();
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Turn);
    assert_eq!(battle.session.subject(), Some(BattlerId::party(0)));
    assert_eq!(battle.action_subjects(), vec![BattlerId::party(0), golem]);

    battle.run_to_phase(Phase::TurnEnd);
    assert_eq!(battle.action_subjects(), vec![BattlerId::party(0), golem]);
    // 20 * 4 - 5 * 2 and 10 * 4 - 10 * 2.
    assert_eq!(battle.units.battler(golem).unwrap().hp(), 430);
    assert_eq!(battle.units.battler(BattlerId::party(0)).unwrap().hp(), 80);
}

#[test]
fn dead_or_unknown_battlers_cannot_be_forced() {
    let mut battle = hero_vs_golem();
    battle.start(Encounter::NORMAL);

    let missing = BattlerId::troop(5);
    let err = battle
        .with_ctx(|session, ctx| session.force_action(ctx, missing))
        .unwrap_err();
    assert_eq!(err, CommandError::UnknownBattler(missing));

    let golem = BattlerId::troop(0);
    battle.units.battler_mut(golem).unwrap().set_hp(0);
    let err = battle
        .with_ctx(|session, ctx| session.force_action(ctx, golem))
        .unwrap_err();
    assert_eq!(err, CommandError::BattlerCannotAct(golem));
}
