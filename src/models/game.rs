//! Match, Score, Side and RoundType for group and knockout fixtures.

use crate::models::forecast::ForecastError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Catalog number of a match (1-based, strictly increasing in forecast order).
pub type MatchNumber = u32;

/// Highest goal count accepted from raw input.
pub const MAX_GOALS: u32 = 99;

/// Group identifier as registered in the catalog (e.g. "A").
pub type GroupId = String;

/// Which side of a match: the first named team (A) or the second (B).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// Phase of the tournament a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    GroupStage,
    #[serde(rename = "round_of_16")]
    RoundOf16,
    QuarterFinals,
    SemiFinals,
    ThirdPlace,
    Final,
}

impl RoundType {
    /// Every round except the group stage is single elimination.
    pub fn is_knockout(self) -> bool {
        self != RoundType::GroupStage
    }
}

/// A forecast score: goals for side A and side B.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub a: u32,
    pub b: u32,
}

impl Score {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Parse two raw tokens. Each must be a non-empty run of ASCII digits, at most `MAX_GOALS`.
    pub fn parse_pair(a: &str, b: &str) -> Result<Self, ForecastError> {
        Ok(Self {
            a: parse_goals(a)?,
            b: parse_goals(b)?,
        })
    }

    pub fn is_draw(&self) -> bool {
        self.a == self.b
    }

    /// Side with the strictly greater score; `None` on a draw.
    pub fn winner(&self) -> Option<Side> {
        if self.a > self.b {
            Some(Side::A)
        } else if self.b > self.a {
            Some(Side::B)
        } else {
            None
        }
    }
}

/// Accepts the "2:0" form: exactly two tokens separated by one colon.
impl FromStr for Score {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(':').collect();
        match tokens.as_slice() {
            [a, b] => Self::parse_pair(a, b),
            _ => Err(ForecastError::MalformedScore(format!(
                "expected two numbers separated by ':', got {:?}",
                s
            ))),
        }
    }
}

fn parse_goals(token: &str) -> Result<u32, ForecastError> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|c| c.is_ascii_digit()) {
        return Err(ForecastError::MalformedScore(format!(
            "{:?} is not a non-negative number",
            token
        )));
    }
    match token.parse::<u32>() {
        Ok(goals) if goals <= MAX_GOALS => Ok(goals),
        _ => Err(ForecastError::MalformedScore(format!(
            "{:?} is above {} goals",
            token, MAX_GOALS
        ))),
    }
}

/// A match with both participants known (group fixture or resolved knockout slot).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub number: MatchNumber,
    pub round: RoundType,
    /// Set for group-stage matches only.
    pub group: Option<GroupId>,
    pub team_a: String,
    pub team_b: String,
}

impl Match {
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    /// Team advancing on `score`; `None` when the score is a draw.
    pub fn winner(&self, score: &Score) -> Option<&str> {
        score.winner().map(|side| self.team(side))
    }

    /// Team eliminated on `score`; `None` when the score is a draw.
    pub fn loser(&self, score: &Score) -> Option<&str> {
        score.winner().map(|side| match side {
            Side::A => self.team(Side::B),
            Side::B => self.team(Side::A),
        })
    }
}
