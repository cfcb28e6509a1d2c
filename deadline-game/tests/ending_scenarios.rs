use deadline_game::{
    Choice, ChoiceKind, Ending, GameState, Impact, Rules, RulesConfig, Stats, advance_day,
    classify_ending, complete_game,
};

fn history(compromise: usize, perfectionism: usize) -> Vec<Choice> {
    let compromises = (0..compromise)
        .map(|i| Choice::new(10, ChoiceKind::Compromise, format!("c{i}"), Impact::default()));
    let perfectionisms = (0..perfectionism)
        .map(|i| Choice::new(11, ChoiceKind::Perfectionism, format!("p{i}"), Impact::default()));
    compromises.chain(perfectionisms).collect()
}

fn state_on_day(day: u32, quality: i32, progress: i32, choices: Vec<Choice>) -> GameState {
    GameState {
        current_day: day,
        stats: Stats {
            quality,
            progress,
            energy: 35,
            bug_count: 17,
        },
        choices,
        ..GameState::default()
    }
}

#[test]
fn high_quality_finished_project_is_a_miracle() {
    let state = state_on_day(30, 85, 96, history(4, 0));
    let done = advance_day(&state).unwrap();
    assert!(done.is_complete);
    assert_eq!(done.current_day, 31);
    assert_eq!(done.ending, Some(Ending::Miracle));
}

#[test]
fn ending_before_day_fifteen_is_abandon_regardless_of_stats() {
    for (quality, progress) in [(0, 0), (75, 60), (79, 100)] {
        assert_eq!(
            classify_ending(13, &Stats { quality, progress, ..Stats::default() }, &history(0, 6)),
            Ending::Abandon
        );
    }

    let short = Rules::new(RulesConfig {
        final_day: 13,
        ..RulesConfig::default()
    })
    .unwrap();
    let done = short
        .advance_day(&state_on_day(13, 75, 60, history(0, 6)))
        .unwrap();
    assert_eq!(done.ending, Some(Ending::Abandon));
}

#[test]
fn polished_but_unfinished_project_is_perfectionism() {
    let done = advance_day(&state_on_day(30, 75, 60, history(0, 1))).unwrap();
    assert_eq!(done.ending, Some(Ending::Perfectionism));
}

#[test]
fn lopsided_perfectionism_history_is_perfectionism() {
    let done = advance_day(&state_on_day(30, 50, 80, history(2, 6))).unwrap();
    assert_eq!(done.ending, Some(Ending::Perfectionism));
}

#[test]
fn everything_else_ships_as_compromise() {
    let done = advance_day(&state_on_day(30, 60, 80, history(3, 2))).unwrap();
    assert_eq!(done.ending, Some(Ending::Compromise));
}

#[test]
fn out_of_band_completion_keeps_the_current_day() {
    let state = state_on_day(11, 90, 20, history(1, 1));
    let done = complete_game(&state, Ending::Abandon).unwrap();
    assert_eq!(done.current_day, 11);
    assert_eq!(done.stats, state.stats);
    assert_eq!(done.choices, state.choices);
    assert_eq!(done.ending, Some(Ending::Abandon));
}
