use crate::battle::engine::Battle;
use crate::battle::state::{
    ActionFailureReason, BattleAction, BattleEvent, BattleKind, BattleOutcome, EventBus,
    TurnOutcome, TurnRng,
};
use crate::battle::tests::common::{has_event, test_dex, trainer_with, TestPokemonBuilder};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn running_from_a_wild_battle_can_succeed() {
    let dex = test_dex();
    let player = TestPokemonBuilder::new("Rattata", 5).build(&dex);
    let mut trainer = trainer_with(vec![player]);
    let opponent = TestPokemonBuilder::new("Pidgey", 5).build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();

    // 80 is the last succeeding roll for the 80% escape chance.
    let mut rng = TurnRng::new_for_test(vec![80]);
    let outcome = battle.resolve_action(BattleAction::Run, &mut rng, &mut events);

    assert_eq!(outcome, TurnOutcome::Ended(BattleOutcome::Fled));
    assert!(has_event(&events, |e| matches!(e, BattleEvent::RanAway)));
}

#[test]
fn failed_escape_consumes_the_turn_and_the_opponent_acts() {
    let dex = test_dex();
    let player = TestPokemonBuilder::new("Rattata", 5).build(&dex);
    let mut trainer = trainer_with(vec![player]);
    let opponent = TestPokemonBuilder::new("Pidgey", 10)
        .with_moves(vec!["Tackle"])
        .build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();
    let player_hp = battle.active().current_hp();

    // 81 fails the escape roll; then the opponent picks and lands Tackle.
    let mut rng = TurnRng::new_for_test(vec![81, 1, 100]);
    let outcome = battle.resolve_action(BattleAction::Run, &mut rng, &mut events);

    assert_eq!(outcome, TurnOutcome::Consumed);
    assert_eq!(battle.turn_number(), 1);
    assert!(has_event(&events, |e| matches!(e, BattleEvent::EscapeFailed)));
    assert!(battle.active().current_hp() < player_hp);
}

#[test]
fn running_from_a_trainer_battle_is_refused_without_consequence() {
    let dex = test_dex();
    let player = TestPokemonBuilder::new("Rattata", 5).build(&dex);
    let mut trainer = trainer_with(vec![player]);
    let opponent = TestPokemonBuilder::new("Onix", 14)
        .with_moves(vec!["Tackle"])
        .build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Trainer, &mut events).unwrap();

    // The refusal rolls nothing and the opponent never moves.
    let mut rng = TurnRng::new_for_test(vec![]);
    let outcome = battle.resolve_action(BattleAction::Run, &mut rng, &mut events);

    assert_eq!(outcome, TurnOutcome::Retry);
    assert_eq!(battle.turn_number(), 0);
    assert!(has_event(&events, |e| matches!(
        e,
        BattleEvent::ActionFailed { reason: ActionFailureReason::CannotRunFromTrainer }
    )));
    assert_eq!(battle.active().current_hp(), battle.active().max_hp());
}

#[test]
fn voluntary_switch_exposes_the_incoming_creature_to_immediate_fire() {
    let dex = test_dex();
    let lead = TestPokemonBuilder::new("Rattata", 12).build(&dex);
    let backup = TestPokemonBuilder::new("Pidgey", 12).build(&dex);
    let mut trainer = trainer_with(vec![lead, backup]);
    let opponent = TestPokemonBuilder::new("Geodude", 12)
        .with_moves(vec!["Tackle"])
        .build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();

    let mut rng = TurnRng::new_for_test(vec![1, 100]);
    let outcome = battle.resolve_action(
        BattleAction::Switch { team_index: 1 },
        &mut rng,
        &mut events,
    );

    assert_eq!(outcome, TurnOutcome::Consumed);
    assert_eq!(battle.active_index(), 1);
    assert!(has_event(&events, |e| matches!(e, BattleEvent::SwitchedIn { .. })));
    // The switch did not shield the newcomer.
    assert!(battle.active().current_hp() < battle.active().max_hp());
    assert_eq!(battle.turn_number(), 1);
}

#[test]
fn switch_resets_the_outgoing_creatures_stages() {
    let dex = test_dex();
    let lead = TestPokemonBuilder::new("Rattata", 12).build(&dex);
    let backup = TestPokemonBuilder::new("Pidgey", 12).build(&dex);
    let mut trainer = trainer_with(vec![lead, backup]);
    let opponent = TestPokemonBuilder::new("Geodude", 12)
        .with_moves(vec!["Growl"])
        .build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();
    battle.trainer.party_mut()[0].stages.attack = 2;

    let mut rng = TurnRng::new_for_test(vec![1]);
    battle.resolve_action(BattleAction::Switch { team_index: 1 }, &mut rng, &mut events);

    assert_eq!(battle.trainer.party()[0].stages.attack, 0);
}

#[rstest]
#[case::same_slot(0)]
#[case::out_of_range(5)]
fn invalid_switch_targets_retry(#[case] team_index: usize) {
    let dex = test_dex();
    let lead = TestPokemonBuilder::new("Rattata", 12).build(&dex);
    let backup = TestPokemonBuilder::new("Pidgey", 12).build(&dex);
    let mut trainer = trainer_with(vec![lead, backup]);
    let opponent = TestPokemonBuilder::new("Geodude", 12).build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();

    let mut rng = TurnRng::new_for_test(vec![]);
    let outcome = battle.resolve_action(
        BattleAction::Switch { team_index },
        &mut rng,
        &mut events,
    );

    assert_eq!(outcome, TurnOutcome::Retry);
    assert_eq!(battle.turn_number(), 0);
    assert_eq!(battle.active_index(), 0);
    assert!(has_event(&events, |e| matches!(
        e,
        BattleEvent::ActionFailed { reason: ActionFailureReason::InvalidSwitchTarget }
    )));
}

#[test]
fn switching_to_a_fainted_member_retries() {
    let dex = test_dex();
    let lead = TestPokemonBuilder::new("Rattata", 12).build(&dex);
    let fainted = TestPokemonBuilder::new("Pidgey", 12).with_hp(0).build(&dex);
    let mut trainer = trainer_with(vec![lead, fainted]);
    let opponent = TestPokemonBuilder::new("Geodude", 12).build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();

    let mut rng = TurnRng::new_for_test(vec![]);
    let outcome = battle.resolve_action(
        BattleAction::Switch { team_index: 1 },
        &mut rng,
        &mut events,
    );
    assert_eq!(outcome, TurnOutcome::Retry);
    assert_eq!(battle.active_index(), 0);
}

#[test]
fn switching_with_a_lone_party_member_retries() {
    let dex = test_dex();
    let lead = TestPokemonBuilder::new("Rattata", 12).build(&dex);
    let mut trainer = trainer_with(vec![lead]);
    let opponent = TestPokemonBuilder::new("Geodude", 12).build(&dex);

    let mut events = EventBus::new();
    let mut battle = Battle::new(&mut trainer, opponent, BattleKind::Wild, &mut events).unwrap();

    let mut rng = TurnRng::new_for_test(vec![]);
    let outcome = battle.resolve_action(
        BattleAction::Switch { team_index: 1 },
        &mut rng,
        &mut events,
    );

    assert_eq!(outcome, TurnOutcome::Retry);
    assert!(has_event(&events, |e| matches!(
        e,
        BattleEvent::ActionFailed { reason: ActionFailureReason::NoOtherPokemon }
    )));
}
