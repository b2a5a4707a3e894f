mod common;

use battle_core::{
    BattleEvent, BattleOptions, BattleOutcome, BattlerId, CommandError, Encounter, Phase,
    SequenceRng,
};
use common::{Battle, HERO, SLIME_PAIR, catalog, units};

/// Hero agi 10 against two slimes of agi 5: initial ratio 0.5 * 10 / 10.
fn hero_vs_pair(options: BattleOptions, rng: SequenceRng) -> Battle {
    let catalog = catalog();
    let units = units(&catalog, &[HERO], SLIME_PAIR);
    Battle::new(catalog, units, options, rng)
}

#[test]
fn failed_escape_raises_ratio_and_runs_the_round() {
    let mut battle = hero_vs_pair(
        BattleOptions::new(true, false),
        SequenceRng::new([]).with_fallback(0.6),
    );
    assert!((battle.session.escape_ratio() - 0.5).abs() < 1e-9);

    battle.start(Encounter::NORMAL);
    battle.tick();
    assert_eq!(battle.session.phase(), Phase::Input);

    let escaped = battle
        .with_ctx(|session, ctx| session.process_escape(ctx))
        .unwrap();
    assert!(!escaped);
    assert!((battle.session.escape_ratio() - 0.6).abs() < 1e-9);
    assert_eq!(battle.session.phase(), Phase::Turn);
    assert!(!battle.session.is_escaped());

    let hero = battle.units.battler(BattlerId::party(0)).unwrap();
    assert_eq!(hero.action_count(), 0);
    for slot in 0..2 {
        let slime = battle.units.battler(BattlerId::troop(slot)).unwrap();
        assert_eq!(slime.action_count(), 1);
        assert!(slime.current_action().is_some_and(|action| action.item.is_some()));
    }
    assert!(battle.events().iter().any(|event| matches!(
        event,
        BattleEvent::EscapeAttempted { success: false, ratio } if (*ratio - 0.5).abs() < 1e-9
    )));

    battle.run_to_phase(Phase::Input);
    let mut subjects = battle.action_subjects();
    subjects.sort_by_key(|id| id.index);
    assert_eq!(subjects, vec![BattlerId::troop(0), BattlerId::troop(1)]);
}

#[test]
fn successful_escape_ends_the_battle_as_escaped() {
    let mut battle = hero_vs_pair(BattleOptions::new(true, false), SequenceRng::new([]));
    battle.start(Encounter::NORMAL);
    battle.tick();

    let escaped = battle
        .with_ctx(|session, ctx| session.process_escape(ctx))
        .unwrap();
    assert!(escaped);
    assert_eq!(battle.session.phase(), Phase::Aborting);

    battle.tick();
    assert_eq!(battle.session.phase(), Phase::BattleEnd);
    assert_eq!(battle.session.outcome(), Some(BattleOutcome::Escaped));
    assert!(battle.session.is_escaped());

    battle.tick();
    assert!(battle.session.is_finished());
    assert!(battle.events().contains(&BattleEvent::BattleFinished {
        outcome: BattleOutcome::Escaped
    }));
    assert!(battle.action_subjects().is_empty());
}

#[test]
fn preemptive_escape_always_succeeds() {
    // Fallback 0.99 would fail any ordinary roll.
    let mut battle = hero_vs_pair(
        BattleOptions::new(true, false),
        SequenceRng::new([]).with_fallback(0.99),
    );
    battle.start(Encounter {
        preemptive: true,
        surprise: false,
    });
    battle.tick();

    let escaped = battle
        .with_ctx(|session, ctx| session.process_escape(ctx))
        .unwrap();
    assert!(escaped);
}

#[test]
fn escape_is_refused_when_forbidden_or_out_of_input() {
    let mut battle = hero_vs_pair(BattleOptions::new(false, false), SequenceRng::new([]));
    battle.start(Encounter::NORMAL);

    let early = battle.with_ctx(|session, ctx| session.process_escape(ctx));
    assert!(matches!(early, Err(CommandError::WrongPhase { .. })));

    battle.tick();
    let forbidden = battle.with_ctx(|session, ctx| session.process_escape(ctx));
    assert_eq!(forbidden, Err(CommandError::EscapeForbidden));
    assert_eq!(battle.session.phase(), Phase::Input);
}
