use deadline_game::{
    Ending, GameSession, Genre, MinigameOutcome, Rules, classify_ending, result_summary,
};

fn play_first_choices(session: &mut GameSession<'_>, skip_minigames: bool) {
    let mut turns = 0;
    while !session.is_complete() {
        turns += 1;
        assert!(turns < 80, "run did not finish");
        if session.minigame_pending() {
            let outcome = if skip_minigames {
                MinigameOutcome::Skipped
            } else {
                MinigameOutcome::Completed
            };
            session.resolve_minigame(outcome).unwrap();
            continue;
        }
        let first = session.today().unwrap().choices[0].id.clone();
        session.choose(&first).unwrap();
    }
}

#[test]
fn first_choice_run_reaches_day_thirty_one() {
    let mut session = GameSession::bundled(1337);
    session.select_genre(Genre::Cyberpunk).unwrap();
    play_first_choices(&mut session, false);

    let state = session.state();
    assert_eq!(state.current_day, 31);
    let ending = state.ending.unwrap();
    assert_ne!(ending, Ending::Abandon);
    // Ending is classified against the last played day.
    let expected = classify_ending(30, &state.stats, &state.choices);
    assert_eq!(ending, expected);

    let summary = result_summary(state, Rules::standard()).unwrap();
    assert_eq!(summary.days_played, 30);
    assert_eq!(summary.skipped_minigames, 0);
    assert_eq!(summary.genre.as_deref(), Some("cyberpunk"));
    assert_eq!(summary.tally.total(), state.choices.len());
}

#[test]
fn skipping_every_minigame_records_compromises() {
    let mut session = GameSession::bundled(7);
    play_first_choices(&mut session, true);
    let summary = result_summary(session.state(), Rules::standard()).unwrap();
    // Days 2, 9, 14, 16, 18, 22, 24, 25, 26 and 27 carry skip impacts.
    assert_eq!(summary.skipped_minigames, 10);
    assert!(summary.tally.compromise >= 10);
}

#[test]
fn same_seed_same_run() {
    let mut first = GameSession::bundled(2024);
    let mut second = GameSession::bundled(2024);
    play_first_choices(&mut first, true);
    play_first_choices(&mut second, true);
    assert_eq!(first.state(), second.state());
    assert_eq!(first.rng_draws(), second.rng_draws());
}

#[test]
fn giving_up_on_day_eleven_abandons() {
    let mut session = GameSession::bundled(3);
    while session.state().current_day < 11 {
        if session.minigame_pending() {
            session.resolve_minigame(MinigameOutcome::Completed).unwrap();
            continue;
        }
        let first = session.today().unwrap().choices[0].id.clone();
        session.choose(&first).unwrap();
    }
    let before = session.state().stats;
    let turn = session.choose("giveup").unwrap();
    assert!(!turn.advanced);
    assert_eq!(turn.ending, Some(Ending::Abandon));
    assert_eq!(session.state().current_day, 11);
    assert_eq!(session.state().stats, before);

    let summary = result_summary(session.state(), Rules::standard()).unwrap();
    assert_eq!(summary.days_played, 11);
    assert!(session.choose("rest").is_err());
}

#[test]
fn reset_starts_over_on_day_one() {
    let mut session = GameSession::bundled(11);
    play_first_choices(&mut session, false);
    session.reset();
    assert_eq!(session.state().current_day, 1);
    assert!(!session.is_complete());
    assert!(session.minigame_pending());
}
