//! Integration tests for contests: joining, resuming and the predictions overview.

use world_cup_forecast::{
    missing_forecasts, predictions, submit_score, BracketCatalog, Contest, ContestError,
    JoinOutcome, Score,
};

#[test]
fn contest_code_must_not_be_blank() {
    assert!(matches!(Contest::new("   "), Err(ContestError::InvalidName)));
    assert_eq!(Contest::new(" family ").unwrap().code, "family");
}

#[test]
fn join_then_rejoin_resumes_the_same_record() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    let mut contest = Contest::new("family").unwrap();
    let joined = contest.join("Richard").unwrap();
    assert!(matches!(joined, JoinOutcome::Joined(_)));

    let player = contest.player_mut("Richard").unwrap();
    submit_score(&catalog, &mut player.forecasts, ("0", "2")).unwrap();

    let rejoined = contest.join("richard ").unwrap();
    assert_eq!(rejoined, JoinOutcome::Rejoined(joined.player_id()));
    assert_eq!(contest.players.len(), 1);
    let player = contest.player("RICHARD").unwrap();
    assert!(player.has_started());
    assert_eq!(player.forecasts.len(), 1);
}

#[test]
fn join_rejects_blank_names() {
    let mut contest = Contest::new("family").unwrap();
    assert_eq!(contest.join("  "), Err(ContestError::InvalidName));
    assert!(contest.players.is_empty());
}

#[test]
fn unknown_player_is_reported() {
    let mut contest = Contest::new("family").unwrap();
    assert_eq!(
        contest.player_mut("Nobody").map(|p| p.name.clone()),
        Err(ContestError::PlayerNotFound("Nobody".into()))
    );
}

#[test]
fn predictions_list_each_player() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    let mut contest = Contest::new("Burgy").unwrap();
    contest.join("Burg 1").unwrap();
    contest.join("Burg 2").unwrap();
    let first = contest.player_mut("Burg 1").unwrap();
    submit_score(&catalog, &mut first.forecasts, ("3", "1")).unwrap();

    let all = predictions(&catalog, &contest, 1).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].player, "Burg 1");
    assert_eq!(all[0].score, Some(Score::new(3, 1)));
    assert_eq!(all[1].score, None);
    let fixture = all[1].fixture.as_ref().unwrap();
    assert_eq!((fixture.team_a.as_str(), fixture.team_b.as_str()), ("Qatar", "Ecuador"));

    assert_eq!(missing_forecasts(&catalog, &contest, 1).unwrap(), ["Burg 2"]);
    assert_eq!(missing_forecasts(&catalog, &contest, 2).unwrap().len(), 2);
}

#[test]
fn knockout_predictions_wait_for_the_bracket() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    let mut contest = Contest::new("Burgy").unwrap();
    contest.join("Burg 1").unwrap();
    let all = predictions(&catalog, &contest, 49).unwrap();
    assert_eq!(all[0].fixture, None);
    assert_eq!(all[0].score, None);
}

#[test]
fn predictions_for_unknown_match_fail() {
    let catalog = BracketCatalog::world_cup_2022().unwrap();
    let contest = Contest::new("Burgy").unwrap();
    assert_eq!(
        predictions(&catalog, &contest, 65),
        Err(ContestError::UnknownMatch(65))
    );
}
