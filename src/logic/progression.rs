//! Progression through the catalog: next match, submitting and cancelling forecasts.
//!
//! Every function here is a pure computation over the catalog and the log. Nothing
//! is cached between calls; standings and bracket slots are recomputed on demand.

use crate::logic::knockout::{final_winner, resolve_knockout_match};
use crate::models::{
    BracketCatalog, CancelOutcome, Fixture, Forecast, ForecastError, ForecastLog, Match,
    RoundType, Score,
};
use serde::Serialize;

/// Where a player stands in the tournament, derived from the log.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    AwaitingGroupMatch,
    /// All group matches forecast; the next call resolves standings into the bracket.
    GroupCompletePendingResolution,
    AwaitingKnockoutMatch,
    Complete,
}

/// Summary of a player's progress.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Progress {
    pub state: ProgressState,
    pub forecast: usize,
    pub total: usize,
}

fn next_fixture<'a>(catalog: &'a BracketCatalog, log: &ForecastLog) -> Option<Fixture<'a>> {
    catalog
        .fixtures()
        .find(|f| log.score_for(f.number()).is_none())
}

/// First catalog match without a forecast, with knockout participants resolved.
/// `None` once the final has a forecast, or when a knockout slot cannot be
/// resolved from the log (`is_complete` tells the two apart).
pub fn next_match(catalog: &BracketCatalog, log: &ForecastLog) -> Option<Match> {
    match next_fixture(catalog, log)? {
        Fixture::Group(g) => Some(Match {
            number: g.number,
            round: RoundType::GroupStage,
            group: Some(g.group.clone()),
            team_a: g.team_a.clone(),
            team_b: g.team_b.clone(),
        }),
        Fixture::Knockout(k) => {
            let resolved = resolve_knockout_match(catalog, log, k);
            if resolved.is_none() {
                log::warn!("Match {} has unresolved slots", k.number);
            }
            resolved
        }
    }
}

pub fn is_complete(catalog: &BracketCatalog, log: &ForecastLog) -> bool {
    next_fixture(catalog, log).is_none()
}

/// Validate raw tokens and append a forecast for the next match.
pub fn submit_score(
    catalog: &BracketCatalog,
    log: &mut ForecastLog,
    raw: (&str, &str),
) -> Result<Forecast, ForecastError> {
    let score = Score::parse_pair(raw.0, raw.1)?;
    submit_forecast(catalog, log, score)
}

/// Append a forecast for the next match. On error the log is left unchanged.
pub fn submit_forecast(
    catalog: &BracketCatalog,
    log: &mut ForecastLog,
    score: Score,
) -> Result<Forecast, ForecastError> {
    let pending = next_fixture(catalog, log).ok_or(ForecastError::TournamentComplete)?;
    let next = next_match(catalog, log).ok_or(ForecastError::UnresolvedMatch {
        match_number: pending.number(),
    })?;
    if next.round.is_knockout() && score.is_draw() {
        return Err(ForecastError::DrawNotAllowed {
            match_number: next.number,
        });
    }
    let forecast = Forecast {
        match_number: next.number,
        score,
    };
    log.push(forecast);
    log::debug!(
        "Forecast {} {}:{} {} (match {})",
        next.team_a,
        score.a,
        score.b,
        next.team_b,
        next.number
    );
    Ok(forecast)
}

/// Remove the most recent forecast.
pub fn cancel_last(log: &mut ForecastLog) -> CancelOutcome {
    match log.pop() {
        Some(forecast) => {
            log::debug!("Cancelled forecast for match {}", forecast.match_number);
            CancelOutcome::Cancelled(forecast)
        }
        None => CancelOutcome::NothingToCancel,
    }
}

/// Predicted champion, defined once every match has a forecast.
pub fn champion(catalog: &BracketCatalog, log: &ForecastLog) -> Option<String> {
    if !is_complete(catalog, log) {
        return None;
    }
    final_winner(catalog, log)
}

pub fn progress_state(catalog: &BracketCatalog, log: &ForecastLog) -> ProgressState {
    match next_fixture(catalog, log) {
        None => ProgressState::Complete,
        Some(Fixture::Group(_)) => ProgressState::AwaitingGroupMatch,
        Some(Fixture::Knockout(_)) => {
            let any_knockout = log.iter().any(|f| {
                catalog
                    .fixture(f.match_number)
                    .is_some_and(|fx| fx.round().is_knockout())
            });
            if any_knockout {
                ProgressState::AwaitingKnockoutMatch
            } else {
                ProgressState::GroupCompletePendingResolution
            }
        }
    }
}

pub fn progress(catalog: &BracketCatalog, log: &ForecastLog) -> Progress {
    Progress {
        state: progress_state(catalog, log),
        forecast: log.len(),
        total: catalog.match_count(),
    }
}
