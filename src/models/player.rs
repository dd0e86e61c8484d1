//! PlayerRecord: a named player and their forecast log.

use crate::models::forecast::ForecastLog;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player record.
pub type PlayerId = Uuid;

/// A player taking part in a contest.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    /// Single source of truth for this player's progress.
    pub forecasts: ForecastLog,
}

impl PlayerRecord {
    /// Create a new player with the given name and an empty log (tournament not started).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            forecasts: ForecastLog::new(),
        }
    }

    pub fn has_started(&self) -> bool {
        !self.forecasts.is_empty()
    }
}
