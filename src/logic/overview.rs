//! Contest overview: every player's forecast for one match.

use crate::logic::knockout::resolve_match;
use crate::models::{BracketCatalog, Contest, ContestError, Match, MatchNumber, Score};
use serde::Serialize;

/// One player's view of a match. Knockout participants differ per player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Prediction {
    pub player: String,
    /// `None` while the player's bracket has not reached this match.
    pub fixture: Option<Match>,
    pub score: Option<Score>,
}

/// Forecasts of every contest player for `match_number`, in join order.
pub fn predictions(
    catalog: &BracketCatalog,
    contest: &Contest,
    match_number: MatchNumber,
) -> Result<Vec<Prediction>, ContestError> {
    if catalog.fixture(match_number).is_none() {
        return Err(ContestError::UnknownMatch(match_number));
    }
    Ok(contest
        .players
        .iter()
        .map(|p| Prediction {
            player: p.name.clone(),
            fixture: resolve_match(catalog, &p.forecasts, match_number),
            score: p.forecasts.score_for(match_number),
        })
        .collect())
}

/// Names of players with no forecast for `match_number` yet.
pub fn missing_forecasts(
    catalog: &BracketCatalog,
    contest: &Contest,
    match_number: MatchNumber,
) -> Result<Vec<String>, ContestError> {
    Ok(predictions(catalog, contest, match_number)?
        .into_iter()
        .filter(|p| p.score.is_none())
        .map(|p| p.player)
        .collect())
}
