//! Knockout rounds: resolving bracket slots and match winners from forecasts.

use crate::logic::standings::group_qualifiers;
use crate::models::{
    BracketCatalog, Fixture, ForecastLog, KnockoutTemplate, Match, MatchNumber, RoundType,
    SlotSource,
};

/// Resolve one slot to a team name, pulling in standings or earlier knockout
/// results as needed. `None` while any input still lacks a forecast.
pub fn resolve_slot(
    catalog: &BracketCatalog,
    log: &ForecastLog,
    source: &SlotSource,
) -> Option<String> {
    match source {
        SlotSource::GroupRank { group, rank } => {
            let qualifiers = group_qualifiers(catalog, group, log)?;
            qualifiers.into_iter().nth(rank.checked_sub(1)?)
        }
        SlotSource::Winner(n) => knockout_result(catalog, log, *n).map(|(winner, _)| winner),
        SlotSource::Loser(n) => knockout_result(catalog, log, *n).map(|(_, loser)| loser),
    }
}

/// Both participants of a knockout template, once known.
pub fn resolve_knockout_match(
    catalog: &BracketCatalog,
    log: &ForecastLog,
    template: &KnockoutTemplate,
) -> Option<Match> {
    Some(Match {
        number: template.number,
        round: template.round,
        group: None,
        team_a: resolve_slot(catalog, log, &template.slot_a)?,
        team_b: resolve_slot(catalog, log, &template.slot_b)?,
    })
}

/// Resolve any catalog match for this log. Group matches always resolve.
pub fn resolve_match(
    catalog: &BracketCatalog,
    log: &ForecastLog,
    number: MatchNumber,
) -> Option<Match> {
    match catalog.fixture(number)? {
        Fixture::Group(g) => Some(Match {
            number: g.number,
            round: RoundType::GroupStage,
            group: Some(g.group.clone()),
            team_a: g.team_a.clone(),
            team_b: g.team_b.clone(),
        }),
        Fixture::Knockout(k) => resolve_knockout_match(catalog, log, k),
    }
}

/// (winner, loser) of a forecast knockout match. Draws never reach the log for
/// knockout matches, so a forecast always yields a result.
fn knockout_result(
    catalog: &BracketCatalog,
    log: &ForecastLog,
    number: MatchNumber,
) -> Option<(String, String)> {
    let template = catalog.knockout_match(number)?;
    let score = log.score_for(number)?;
    let m = resolve_knockout_match(catalog, log, template)?;
    let winner = m.winner(&score)?.to_string();
    let loser = m.loser(&score)?.to_string();
    Some((winner, loser))
}

/// Team that won the final, or `None` until it has a forecast.
pub fn final_winner(catalog: &BracketCatalog, log: &ForecastLog) -> Option<String> {
    let final_match = catalog.final_match()?;
    knockout_result(catalog, log, final_match.number).map(|(winner, _)| winner)
}
