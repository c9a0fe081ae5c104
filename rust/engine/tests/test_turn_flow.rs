use pigdice_engine::errors::GameError;
use pigdice_engine::rules::{apply_roll, RollOutcome};
use pigdice_engine::state::UserGameState;

#[test]
fn rolls_without_bust_accumulate_turn_score() {
    let mut state = UserGameState::default();
    let rolls = [6u8, 5, 4, 2, 3];
    for (i, die) in rolls.iter().enumerate() {
        let outcome = apply_roll(&mut state, *die).expect("roll ok");
        assert!(matches!(outcome, RollOutcome::Scored { .. }));
        assert_eq!(state.round, (i + 1) as u32);
        assert_eq!(state.last_roll, *die);
    }
    let expected: u32 = rolls.iter().map(|d| u32::from(*d)).sum();
    assert_eq!(state.turn_score, expected);
    assert_eq!(state.turn, 0);
    assert_eq!(state.total_score, 0);
}

#[test]
fn rolling_one_busts_regardless_of_prior_score() {
    // Scenario: mid-turn with 12 unbanked points
    let mut state = UserGameState::default();
    apply_roll(&mut state, 6).expect("roll");
    apply_roll(&mut state, 6).expect("roll");
    assert_eq!(state.turn_score, 12);

    let outcome = apply_roll(&mut state, 1).expect("roll");
    assert_eq!(outcome, RollOutcome::Busted);
    assert_eq!(state.turn_score, 0);
    assert_eq!(state.turn, 1);
    assert_eq!(state.last_roll, 1);
    assert_eq!(state.round, 3);
    assert!(!state.game_over);
}

#[test]
fn bust_never_touches_banked_score() {
    let mut state = UserGameState {
        total_score: 50,
        ..Default::default()
    };
    apply_roll(&mut state, 4).expect("roll");
    apply_roll(&mut state, 1).expect("roll");
    assert_eq!(state.total_score, 50);
}

#[test]
fn out_of_range_die_is_rejected_and_state_untouched() {
    let mut state = UserGameState::default();
    apply_roll(&mut state, 3).expect("roll");
    let before = state.clone();

    for bad in [0u8, 7, 255] {
        let err = apply_roll(&mut state, bad).expect_err("invalid die");
        assert_eq!(err, GameError::InvalidDieValue { value: bad });
        assert_eq!(state, before);
    }
}

#[test]
fn roll_on_finished_game_fails_and_state_untouched() {
    let mut state = UserGameState {
        total_score: 104,
        round: 12,
        turn: 6,
        game_over: true,
        ..Default::default()
    };
    let before = state.clone();

    let err = apply_roll(&mut state, 5).expect_err("game over");
    assert_eq!(err, GameError::GameOver);
    assert_eq!(state, before);
}
