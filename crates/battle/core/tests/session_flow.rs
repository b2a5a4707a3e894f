mod common;

use battle_core::{
    ActionError, ActionItem, BattleEvent, BattleOptions, BattleOutcome, BattlerId, BusyFlags,
    CommandError, Encounter, EventId, HitType, ItemEffect, ItemId, Phase, Scope, SequenceRng,
    SkillDef, SkillId, TroopId, Usable,
};
use common::{ATTACK, Battle, FIRE, HERO, KNIGHT, POTION, SLIME_PAIR, catalog, units};

fn hero_vs_slime() -> Battle {
    let catalog = catalog();
    let units = units(&catalog, &[HERO], TroopId(1));
    Battle::new(catalog, units, BattleOptions::new(true, false), SequenceRng::new([]))
}

#[test]
fn faster_battler_acts_first_and_victory_stops_the_round() {
    let mut battle = hero_vs_slime();
    battle.start(Encounter::NORMAL);
    assert_eq!(battle.session.phase(), Phase::Start);

    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Input);
    battle.input_all(ActionItem::Skill(ATTACK), Some(0));

    // Hero agi 10 vs slime agi 5, no speed variance drawn above zero.
    assert_eq!(battle.session.phase(), Phase::Turn);
    assert_eq!(
        battle.session.action_order().collect::<Vec<_>>(),
        vec![BattlerId::party(0), BattlerId::troop(0)]
    );

    battle.run_to_phase(Phase::BattleEnd);
    assert_eq!(battle.session.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(battle.action_subjects(), vec![BattlerId::party(0)]);

    // 20 * 4 - 5 * 2 = 70 damage on a 30 HP slime.
    let slime = battle.units.battler(BattlerId::troop(0)).unwrap();
    assert!(slime.is_dead());

    let rewards = battle.session.rewards().unwrap().clone();
    assert_eq!(rewards.exp, 10);
    assert_eq!(rewards.gold, 20);
    assert_eq!(rewards.items, vec![POTION]);
    assert_eq!(battle.units.party.gold, 20);
    assert_eq!(battle.units.party.item_count(POTION), 1);

    battle.tick();
    assert!(battle.session.is_finished());
    assert!(matches!(
        battle.events().last(),
        Some(BattleEvent::BattleFinished {
            outcome: BattleOutcome::Victory
        })
    ));
}

#[test]
fn unusable_action_is_discarded_and_turn_moves_on() {
    let mut battle = hero_vs_slime();
    battle
        .units
        .battler_mut(BattlerId::party(0))
        .unwrap()
        .set_mp(0);
    battle.start(Encounter::NORMAL);
    battle.tick();
    battle.input_all(ActionItem::Skill(FIRE), Some(0));

    battle.tick();
    assert!(battle.events().iter().any(|event| matches!(
        event,
        BattleEvent::ActionDiscarded {
            subject,
            reason: ActionError::InsufficientMp {
                required: 5,
                available: 0,
                ..
            },
        } if *subject == BattlerId::party(0)
    )));
    assert_eq!(battle.session.subject(), Some(BattlerId::troop(0)));

    battle.run_to_phase(Phase::TurnEnd);
    assert_eq!(battle.action_subjects(), vec![BattlerId::troop(0)]);
    // Slime attack: 10 * 4 - 10 * 2.
    assert_eq!(battle.units.battler(BattlerId::party(0)).unwrap().hp(), 80);
}

#[test]
fn missing_item_is_discarded() {
    let mut battle = hero_vs_slime();
    battle.start(Encounter::NORMAL);
    battle.tick();
    battle.input_all(ActionItem::Item(ItemId(1)), Some(0));

    battle.tick();
    assert!(battle.events().iter().any(|event| matches!(
        event,
        BattleEvent::ActionDiscarded {
            reason: ActionError::ItemUnavailable { .. },
            ..
        }
    )));
}

#[test]
fn surprise_skips_party_input_for_one_round() {
    let mut battle = hero_vs_slime();
    battle.start(Encounter {
        preemptive: false,
        surprise: true,
    });
    assert!(battle.events().contains(&BattleEvent::Surprise));

    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Turn);
    assert_eq!(
        battle.session.action_order().collect::<Vec<_>>(),
        vec![BattlerId::troop(0)]
    );

    battle.run_to_phase(Phase::Input);
    assert_eq!(battle.action_subjects(), vec![BattlerId::troop(0)]);
    assert_eq!(battle.session.encounter(), Encounter::NORMAL);
    assert!(battle.events().contains(&BattleEvent::TurnEnded { turn: 1 }));
}

#[test]
fn preemptive_keeps_the_troop_out_of_the_first_round() {
    let mut battle = hero_vs_slime();
    battle
        .units
        .battler_mut(BattlerId::troop(0))
        .unwrap()
        .params
        .mhp = 500;
    battle
        .units
        .battler_mut(BattlerId::troop(0))
        .unwrap()
        .set_hp(500);
    battle.start(Encounter {
        preemptive: true,
        surprise: false,
    });
    battle.tick();
    battle.input_all(ActionItem::Skill(ATTACK), Some(0));
    assert_eq!(
        battle.session.action_order().collect::<Vec<_>>(),
        vec![BattlerId::party(0)]
    );

    battle.run_to_phase(Phase::Input);
    assert_eq!(battle.action_subjects(), vec![BattlerId::party(0)]);
    assert_eq!(battle.units.troop.turn_count(), 1);
}

#[test]
fn busy_host_holds_the_battle() {
    let mut battle = hero_vs_slime();
    battle.start(Encounter::NORMAL);
    battle.host.busy = BusyFlags::MESSAGE | BusyFlags::ANIMATION;

    for _ in 0..5 {
        battle.tick();
    }
    assert_eq!(battle.session.phase(), Phase::Start);

    battle.host.busy = BusyFlags::empty();
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Input);
}

#[test]
fn commands_are_rejected_outside_input() {
    let mut battle = hero_vs_slime();
    let err = battle
        .session
        .input_action(&mut battle.units, ActionItem::Skill(ATTACK), Some(0))
        .unwrap_err();
    assert_eq!(
        err,
        CommandError::WrongPhase {
            expected: Phase::Input,
            actual: Phase::Init,
        }
    );

    battle.start(Encounter::NORMAL);
    let again = battle.with_ctx(|session, ctx| session.start_battle(ctx));
    assert!(again.is_err());
}

#[test]
fn abort_ends_without_rewards() {
    let mut battle = hero_vs_slime();
    battle.start(Encounter::NORMAL);
    battle.tick();
    battle.with_ctx(|session, ctx| session.abort(ctx));
    assert!(battle.session.is_aborting());

    battle.tick();
    assert_eq!(battle.session.outcome(), Some(BattleOutcome::Aborted));
    assert!(battle.session.is_escaped());
    assert!(battle.session.rewards().is_none());

    battle.tick();
    assert!(battle.session.is_finished());
}

#[test]
fn command_cursor_walks_forward_and_back() {
    let catalog = catalog();
    let units = units(&catalog, &[HERO, KNIGHT], TroopId(1));
    let mut battle = Battle::new(
        catalog,
        units,
        BattleOptions::new(true, false),
        SequenceRng::new([]),
    );
    battle.start(Encounter::NORMAL);
    battle.tick();
    assert_eq!(battle.session.actor(&battle.units), None);

    battle
        .with_ctx(|session, ctx| session.select_next_command(ctx))
        .unwrap();
    assert_eq!(battle.session.actor(&battle.units), Some(BattlerId::party(0)));
    battle
        .with_ctx(|session, ctx| session.select_next_command(ctx))
        .unwrap();
    assert_eq!(battle.session.actor(&battle.units), Some(BattlerId::party(1)));

    battle
        .with_ctx(|session, ctx| session.select_previous_command(ctx))
        .unwrap();
    assert_eq!(battle.session.actor(&battle.units), Some(BattlerId::party(0)));
    battle
        .with_ctx(|session, ctx| session.select_previous_command(ctx))
        .unwrap();
    assert_eq!(battle.session.actor(&battle.units), None);
    assert!(battle.session.is_inputting());
}

#[test]
fn running_battle_event_holds_the_start_phase() {
    let mut battle = hero_vs_slime();
    battle.start(Encounter::NORMAL);

    battle.host.event_running = true;
    battle.tick();
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Start);

    battle.host.event_running = false;
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Input);
}

#[test]
fn global_effect_fires_once_for_many_targets() {
    const HOWL: SkillId = SkillId(9);
    let mut catalog = catalog();
    catalog.insert_skill(SkillDef {
        id: HOWL,
        mp_cost: 0,
        usable: Usable::new("Howl", Scope::AllEnemies, HitType::CertainHit)
            .with_effect(ItemEffect::ReserveEvent(EventId(4))),
    });
    let units = units(&catalog, &[HERO], SLIME_PAIR);
    let mut battle = Battle::new(
        catalog,
        units,
        BattleOptions::new(true, false),
        SequenceRng::new([]),
    );

    battle.start(Encounter {
        preemptive: true,
        surprise: false,
    });
    battle.tick();
    battle.input_all(ActionItem::Skill(HOWL), None);
    battle.run_to_phase(Phase::TurnEnd);

    let targets: Vec<BattlerId> = battle
        .events()
        .iter()
        .find_map(|event| match event {
            BattleEvent::ActionStarted { targets, .. } => Some(targets.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(targets, vec![BattlerId::troop(0), BattlerId::troop(1)]);

    let reserved = battle
        .events()
        .iter()
        .filter(|event| matches!(event, BattleEvent::EventReserved { .. }))
        .count();
    assert_eq!(reserved, 1);
    assert_eq!(battle.session.take_reserved_events(), vec![EventId(4)]);
    assert!(battle.session.take_reserved_events().is_empty());
}

#[test]
fn equal_speeds_keep_roster_order_and_fallen_battlers_are_skipped() {
    let catalog = catalog();
    let units = units(&catalog, &[HERO], SLIME_PAIR);
    let mut battle = Battle::new(
        catalog,
        units,
        BattleOptions::new(true, false),
        SequenceRng::new([]),
    );
    battle.start(Encounter::NORMAL);
    battle.tick();
    battle.input_all(ActionItem::Skill(ATTACK), Some(1));

    // Both slimes roll speed 5.
    assert_eq!(
        battle.session.action_order().collect::<Vec<_>>(),
        vec![BattlerId::party(0), BattlerId::troop(0), BattlerId::troop(1)]
    );
    assert!(battle.session.is_in_turn());

    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Action);
    assert!(!battle.session.is_in_turn());

    battle.run_to_phase(Phase::TurnEnd);
    assert!(battle.units.battler(BattlerId::troop(1)).unwrap().is_dead());
    assert_eq!(
        battle.action_subjects(),
        vec![BattlerId::party(0), BattlerId::troop(0)]
    );
    assert_eq!(battle.units.battler(BattlerId::party(0)).unwrap().hp(), 80);
}

#[test]
fn empty_party_aborts_the_battle() {
    let catalog = catalog();
    let units = units(&catalog, &[], TroopId(1));
    let mut battle = Battle::new(
        catalog,
        units,
        BattleOptions::new(true, false),
        SequenceRng::new([]),
    );
    battle.start(Encounter::NORMAL);
    battle.tick();

    assert_eq!(battle.session.phase(), Phase::BattleEnd);
    assert_eq!(battle.session.outcome(), Some(BattleOutcome::Aborted));
    assert!(battle.session.is_escaped());
    assert!(battle.session.rewards().is_none());

    battle.tick();
    assert!(battle.session.is_finished());
}
