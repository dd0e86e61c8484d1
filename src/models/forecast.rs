//! Forecast log and the errors a submission can produce.

use crate::models::game::{MatchNumber, Score};
use serde::{Deserialize, Serialize};

/// Errors returned when a forecast is rejected. The log is never modified on error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ForecastError {
    /// Input is not exactly two non-negative integers.
    MalformedScore(String),
    /// Equal scores submitted for a knockout match.
    DrawNotAllowed { match_number: MatchNumber },
    /// Every match including the final already has a forecast.
    TournamentComplete,
    /// The next match depends on a result the log cannot provide (e.g. a
    /// knockout draw in a log loaded from storage).
    UnresolvedMatch { match_number: MatchNumber },
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::MalformedScore(reason) => write!(f, "Malformed score: {}", reason),
            ForecastError::DrawNotAllowed { .. } => {
                write!(f, "Draw in knockout stage is not allowed")
            }
            ForecastError::TournamentComplete => write!(f, "All matches already have a forecast"),
            ForecastError::UnresolvedMatch { match_number } => {
                write!(f, "Participants of match {} cannot be resolved", match_number)
            }
        }
    }
}

impl std::error::Error for ForecastError {}

/// One predicted result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub match_number: MatchNumber,
    pub score: Score,
}

/// Outcome of `cancel_last`. An empty log is a no-op, not an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CancelOutcome {
    Cancelled(Forecast),
    NothingToCancel,
}

/// Ordered, append-only (except for undo) record of a player's forecasts.
///
/// Owned by the caller; the engine only reads it or appends/removes through
/// `submit_score` and `cancel_last`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastLog(Vec<Forecast>);

impl ForecastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Forecast> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Forecast> {
        self.0.last()
    }

    /// Forecast score for a catalog match, if one was submitted.
    pub fn score_for(&self, match_number: MatchNumber) -> Option<Score> {
        self.0
            .iter()
            .find(|f| f.match_number == match_number)
            .map(|f| f.score)
    }

    pub(crate) fn push(&mut self, forecast: Forecast) {
        self.0.push(forecast);
    }

    pub(crate) fn pop(&mut self) -> Option<Forecast> {
        self.0.pop()
    }
}

impl<'a> IntoIterator for &'a ForecastLog {
    type Item = &'a Forecast;
    type IntoIter = std::slice::Iter<'a, Forecast>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
