use deadline_game::{
    ChoiceKind, DayScript, Difficulty, Ending, GameState, Genre, Minigame, RulesConfig,
};

#[test]
fn bundled_script_covers_every_day_once() {
    let script = DayScript::bundled();
    assert_eq!(script.len(), 30);
    let days: Vec<u32> = script.iter().map(|day| day.day).collect();
    assert_eq!(days, (1..=30).collect::<Vec<_>>());
    for day in script.iter() {
        assert!(!day.title.is_empty(), "day {} has no title", day.day);
        assert!(
            day.has_minigame() || !day.choices.is_empty(),
            "day {} offers nothing to do",
            day.day
        );
        assert!((1..=3).contains(&day.act), "day {} act {}", day.day, day.act);
    }
}

#[test]
fn later_duplicates_are_shadowed() {
    let script = DayScript::bundled();
    let shadowed: Vec<u32> = script.shadowed().iter().map(|day| day.day).collect();
    assert_eq!(shadowed, vec![25, 26, 27]);
    assert_eq!(script.day(25).and_then(|day| day.minigame.as_deref()), Some("qa-20"));
    assert!(script.day(26).unwrap().choice("critical").is_some());
    assert!(script.day(26).unwrap().choice("cinematic").is_none());
}

#[test]
fn every_bundled_minigame_tag_parses() {
    let script = DayScript::bundled();
    for day in script.iter().filter(|day| day.has_minigame()) {
        assert!(
            day.minigame_kind().is_some(),
            "day {} tag {:?}",
            day.day,
            day.minigame
        );
    }
    assert_eq!(script.day(1).unwrap().minigame_kind(), Some(Minigame::GenreSelect));
    assert_eq!(
        script.day(24).unwrap().minigame_kind(),
        Some(Minigame::BugFix(Difficulty::Hard))
    );
    assert_eq!(
        script.day(18).unwrap().minigame_kind(),
        Some(Minigame::Build { seconds: 15 })
    );
}

#[test]
fn minigame_only_days_carry_skip_impacts() {
    for day in DayScript::bundled().iter().filter(|day| day.is_minigame_only()) {
        assert!(day.minigame_skip_impact.is_some(), "day {}", day.day);
    }
}

#[test]
fn abandon_is_offered_exactly_once() {
    let abandon_days: Vec<u32> = DayScript::bundled()
        .iter()
        .filter(|day| day.choices.iter().any(|c| c.kind == ChoiceKind::Abandon))
        .map(|day| day.day)
        .collect();
    assert_eq!(abandon_days, vec![11]);
}

#[test]
fn genre_descriptions_fall_back_to_default() {
    let script = DayScript::bundled();
    for day in script.iter() {
        let plain = day.description.render(None);
        assert!(!plain.is_empty());
        for genre in Genre::ALL {
            assert!(!day.description.render(Some(genre)).is_empty());
        }
    }
}

#[test]
fn game_state_serializes_with_lowercase_enums() {
    let mut state = GameState::new().with_genre(Genre::Postapoc);
    state.is_complete = true;
    state.ending = Some(Ending::Miracle);
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["selected_genre"], "postapoc");
    assert_eq!(json["ending"], "miracle");
    let back: GameState = serde_json::from_value(json).unwrap();
    assert_eq!(back, state);
}

#[test]
fn empty_rules_json_means_defaults() {
    let cfg = RulesConfig::from_json("{}").unwrap();
    assert_eq!(cfg, RulesConfig::default());
    assert!(cfg.validate().is_ok());
}
