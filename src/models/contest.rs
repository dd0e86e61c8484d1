//! Contest: a named pool of players forecasting the same tournament.

use crate::models::game::MatchNumber;
use crate::models::player::{PlayerId, PlayerRecord};
use serde::{Deserialize, Serialize};

/// Errors that can occur during contest operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ContestError {
    /// Contest codes and player names must not be blank.
    InvalidName,
    /// No player with this name in the contest.
    PlayerNotFound(String),
    /// Match number is not part of the catalog.
    UnknownMatch(MatchNumber),
}

impl std::fmt::Display for ContestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContestError::InvalidName => write!(f, "Name must not be empty"),
            ContestError::PlayerNotFound(name) => write!(f, "Player {} not found", name),
            ContestError::UnknownMatch(n) => write!(f, "Match {} is not in the catalog", n),
        }
    }
}

impl std::error::Error for ContestError {}

/// Whether `join` created a player or found an existing one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JoinOutcome {
    Joined(PlayerId),
    Rejoined(PlayerId),
}

impl JoinOutcome {
    pub fn player_id(self) -> PlayerId {
        match self {
            JoinOutcome::Joined(id) | JoinOutcome::Rejoined(id) => id,
        }
    }
}

/// A contest and its players in join order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contest {
    pub code: String,
    pub players: Vec<PlayerRecord>,
}

impl Contest {
    /// Create an empty contest. The code is trimmed and must not be blank.
    pub fn new(code: impl Into<String>) -> Result<Self, ContestError> {
        let code = code.into();
        let code = code.trim();
        if code.is_empty() {
            return Err(ContestError::InvalidName);
        }
        Ok(Self {
            code: code.to_string(),
            players: Vec::new(),
        })
    }

    /// Join by name, or resume the existing record. Names are unique, case-insensitive.
    pub fn join(&mut self, name: &str) -> Result<JoinOutcome, ContestError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContestError::InvalidName);
        }
        if let Some(p) = self.player(name) {
            log::info!("Player {} rejoined contest {}", p.name, self.code);
            return Ok(JoinOutcome::Rejoined(p.id));
        }
        let player = PlayerRecord::new(name);
        let id = player.id;
        self.players.push(player);
        log::info!("Player {} joined contest {}", name, self.code);
        Ok(JoinOutcome::Joined(id))
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        let name = name.trim();
        self.players.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn player_mut(&mut self, name: &str) -> Result<&mut PlayerRecord, ContestError> {
        let name = name.trim();
        self.players
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ContestError::PlayerNotFound(name.to_string()))
    }
}
