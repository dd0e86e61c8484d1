//! Integration tests for catalog loading, validation and knockout slot resolution.

use serde_json::{json, Value};
use world_cup_forecast::{
    champion, group_qualifiers, is_complete, next_match, resolve_slot, submit_score,
    BracketCatalog, ConfigurationError, ForecastError, ForecastLog, RoundType, SlotSource,
};

/// Two groups of two, semifinals, third place and final.
fn mini_catalog() -> Value {
    json!({
        "name": "Mini cup",
        "groups": [
            { "id": "A", "teams": ["Alpha", "Bravo"] },
            { "id": "B", "teams": ["Charlie", "Delta"] }
        ],
        "group_matches": [
            { "number": 1, "group": "A", "team_a": "Alpha", "team_b": "Bravo" },
            { "number": 2, "group": "B", "team_a": "Charlie", "team_b": "Delta" }
        ],
        "knockout": [
            { "number": 3, "round": "semi_finals",
              "slot_a": { "group_rank": { "group": "A", "rank": 1 } },
              "slot_b": { "group_rank": { "group": "B", "rank": 2 } } },
            { "number": 4, "round": "semi_finals",
              "slot_a": { "group_rank": { "group": "B", "rank": 1 } },
              "slot_b": { "group_rank": { "group": "A", "rank": 2 } } },
            { "number": 5, "round": "third_place",
              "slot_a": { "loser": 3 }, "slot_b": { "loser": 4 } },
            { "number": 6, "round": "final", "slot_a": { "winner": 3 }, "slot_b": { "winner": 4 } }
        ]
    })
}

fn load(value: &Value) -> Result<BracketCatalog, ConfigurationError> {
    BracketCatalog::from_json(&value.to_string())
}

#[test]
fn builtin_catalog_shape() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    assert_eq!(catalog.groups().count(), 8);
    assert_eq!(
        catalog.groups().map(String::as_str).collect::<Vec<_>>(),
        ["A", "B", "C", "D", "E", "F", "G", "H"]
    );
    assert_eq!(catalog.match_count(), 64);
    for g in catalog.groups() {
        assert_eq!(catalog.matches_in_group(g).count(), 6);
    }
    assert_eq!(catalog.knockout_round_after_groups().count(), 8);
    assert_eq!(catalog.knockout_round(RoundType::QuarterFinals).count(), 4);
    assert_eq!(catalog.knockout_round(RoundType::SemiFinals).count(), 2);
    assert_eq!(catalog.final_match().map(|f| f.number), Some(64));
}

#[test]
fn rounds_follow_each_other() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    let mut round = RoundType::GroupStage;
    let mut seen = vec![round];
    while let Some(next) = catalog.round_after(round) {
        seen.push(next);
        round = next;
    }
    assert_eq!(
        seen,
        [
            RoundType::GroupStage,
            RoundType::RoundOf16,
            RoundType::QuarterFinals,
            RoundType::SemiFinals,
            RoundType::ThirdPlace,
            RoundType::Final,
        ]
    );
}

#[test]
fn mini_league_decides_a_real_group() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    let mut log = ForecastLog::new();
    // Group F: Belgium and Canada finish level on points, difference and goals.
    let scores = [
        (9, "0", "2"),
        (12, "2", "0"),
        (26, "0", "2"),
        (27, "0", "2"),
        (41, "0", "2"),
        (42, "2", "0"),
    ];
    while log.len() < 48 {
        let number = next_match(&catalog, &log).unwrap().number;
        let raw = scores
            .iter()
            .find(|(n, _, _)| *n == number)
            .map_or(("1", "0"), |&(_, a, b)| (a, b));
        submit_score(&catalog, &mut log, raw).unwrap();
    }
    assert_eq!(
        group_qualifiers(&catalog, "F", &log).unwrap(),
        ["Belgium", "Canada"]
    );
    let runner_up = SlotSource::GroupRank {
        group: "F".into(),
        rank: 2,
    };
    assert_eq!(resolve_slot(&catalog, &log, &runner_up).as_deref(), Some("Canada"));
}

#[test]
fn mini_catalog_runs_to_a_champion() {
    let catalog = load(&mini_catalog()).unwrap();
    let mut log = ForecastLog::new();
    submit_score(&catalog, &mut log, ("1", "0")).unwrap(); // Alpha
    submit_score(&catalog, &mut log, ("0", "3")).unwrap(); // Delta

    let semi = next_match(&catalog, &log).unwrap();
    assert_eq!((semi.team_a.as_str(), semi.team_b.as_str()), ("Alpha", "Charlie"));
    submit_score(&catalog, &mut log, ("0", "1")).unwrap(); // Charlie
    submit_score(&catalog, &mut log, ("2", "1")).unwrap(); // Delta over Bravo

    let third = next_match(&catalog, &log).unwrap();
    assert_eq!(third.round, RoundType::ThirdPlace);
    assert_eq!((third.team_a.as_str(), third.team_b.as_str()), ("Alpha", "Bravo"));
    submit_score(&catalog, &mut log, ("4", "0")).unwrap();

    let last = next_match(&catalog, &log).unwrap();
    assert_eq!((last.team_a.as_str(), last.team_b.as_str()), ("Charlie", "Delta"));
    submit_score(&catalog, &mut log, ("0", "1")).unwrap();
    assert_eq!(champion(&catalog, &log).as_deref(), Some("Delta"));
}

#[test]
fn stored_log_with_knockout_draw_is_not_complete() {
    let catalog = load(&mini_catalog()).unwrap();
    let stored = json!([
        { "match_number": 1, "score": { "a": 1, "b": 0 } },
        { "match_number": 2, "score": { "a": 0, "b": 3 } },
        { "match_number": 3, "score": { "a": 1, "b": 1 } },
        { "match_number": 4, "score": { "a": 2, "b": 1 } }
    ]);
    let mut log: ForecastLog = serde_json::from_value(stored).unwrap();
    let before = log.clone();

    assert!(next_match(&catalog, &log).is_none());
    assert!(!is_complete(&catalog, &log));
    assert_eq!(champion(&catalog, &log), None);
    assert_eq!(
        submit_score(&catalog, &mut log, ("2", "0")),
        Err(ForecastError::UnresolvedMatch { match_number: 5 })
    );
    assert_eq!(log, before);
}

#[test]
fn rejects_empty_group() {
    let mut v = mini_catalog();
    v["groups"][0]["teams"] = json!([]);
    assert_eq!(load(&v), Err(ConfigurationError::EmptyGroup("A".into())));
}

#[test]
fn rejects_incomplete_round_robin() {
    let mut v = mini_catalog();
    v["group_matches"].as_array_mut().unwrap().remove(1);
    assert_eq!(load(&v), Err(ConfigurationError::IncompleteRoundRobin("B".into())));
}

#[test]
fn rejects_fixture_outside_group() {
    let mut v = mini_catalog();
    v["group_matches"][0]["team_b"] = json!("Charlie");
    assert_eq!(load(&v), Err(ConfigurationError::InvalidFixture { match_number: 1 }));
}

#[test]
fn rejects_source_from_a_later_match() {
    let mut v = mini_catalog();
    v["knockout"][0]["slot_a"] = json!({ "winner": 6 });
    assert_eq!(
        load(&v),
        Err(ConfigurationError::UnresolvableSource { match_number: 3, source: 6 })
    );
}

#[test]
fn rejects_rank_that_does_not_qualify() {
    let mut v = mini_catalog();
    v["knockout"][0]["slot_a"] = json!({ "group_rank": { "group": "A", "rank": 3 } });
    assert_eq!(
        load(&v),
        Err(ConfigurationError::RankOutOfRange { match_number: 3, rank: 3 })
    );
}

#[test]
fn rejects_unknown_group_source() {
    let mut v = mini_catalog();
    v["knockout"][1]["slot_a"] = json!({ "group_rank": { "group": "Z", "rank": 1 } });
    assert_eq!(
        load(&v),
        Err(ConfigurationError::UnknownGroup { match_number: 4, group: "Z".into() })
    );
}

#[test]
fn rejects_missing_or_misplaced_final() {
    let mut v = mini_catalog();
    v["knockout"].as_array_mut().unwrap().pop();
    assert_eq!(load(&v), Err(ConfigurationError::MissingFinal));

    let mut v = mini_catalog();
    v["knockout"][2]["round"] = json!("final");
    v["knockout"][3]["round"] = json!("third_place");
    assert_eq!(load(&v), Err(ConfigurationError::FinalNotLast));
}

#[test]
fn rejects_out_of_order_numbers() {
    let mut v = mini_catalog();
    v["knockout"][1]["number"] = json!(3);
    assert_eq!(load(&v), Err(ConfigurationError::MatchOrder(3)));
}

#[test]
fn rejects_duplicate_team() {
    let mut v = mini_catalog();
    v["groups"][1]["teams"][0] = json!("Alpha");
    assert_eq!(load(&v), Err(ConfigurationError::DuplicateTeam("Alpha".into())));
}

#[test]
fn rejects_invalid_json() {
    assert!(matches!(
        BracketCatalog::from_json("{ not json"),
        Err(ConfigurationError::Parse(_))
    ));
    assert!(matches!(
        BracketCatalog::from_path("/nonexistent/catalog.json"),
        Err(ConfigurationError::Io(_))
    ));
}
