//! Bracket catalog: groups, group fixtures and knockout templates in forecast order.

use crate::models::game::{GroupId, MatchNumber, RoundType};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Number of teams per group that advance to the knockout rounds.
pub const QUALIFIERS_PER_GROUP: usize = 2;

const WORLD_CUP_2022: &str = include_str!("../../data/world_cup_2022.json");

/// Malformed catalog. Fatal at startup, never produced per call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigurationError {
    /// Catalog file could not be read.
    Io(String),
    /// Catalog is not valid JSON for the expected shape.
    Parse(String),
    NoGroups,
    EmptyGroup(GroupId),
    DuplicateGroup(GroupId),
    DuplicateTeam(String),
    UnknownGroup { match_number: MatchNumber, group: GroupId },
    /// Fixture names a team outside its group, or a team against itself.
    InvalidFixture { match_number: MatchNumber },
    /// Group fixtures are not a single full round-robin.
    IncompleteRoundRobin(GroupId),
    /// Match numbers must be unique and increase in forecast order.
    MatchOrder(MatchNumber),
    /// A knockout template is tagged with the group stage round.
    NotKnockoutRound(MatchNumber),
    /// Rounds must appear as contiguous blocks.
    RoundsNotContiguous(RoundType),
    RankOutOfRange { match_number: MatchNumber, rank: usize },
    /// Source does not reference an earlier knockout match.
    UnresolvableSource { match_number: MatchNumber, source: MatchNumber },
    MissingFinal,
    FinalNotLast,
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::Io(e) => write!(f, "Cannot read catalog: {}", e),
            ConfigurationError::Parse(e) => write!(f, "Cannot parse catalog: {}", e),
            ConfigurationError::NoGroups => write!(f, "Catalog has no groups"),
            ConfigurationError::EmptyGroup(g) => write!(f, "Group {} has no teams", g),
            ConfigurationError::DuplicateGroup(g) => write!(f, "Group {} is defined twice", g),
            ConfigurationError::DuplicateTeam(t) => write!(f, "Team {} is registered twice", t),
            ConfigurationError::UnknownGroup { match_number, group } => {
                write!(f, "Match {} references unknown group {}", match_number, group)
            }
            ConfigurationError::InvalidFixture { match_number } => {
                write!(f, "Match {} does not pair two teams of its group", match_number)
            }
            ConfigurationError::IncompleteRoundRobin(g) => {
                write!(f, "Group {} is not a full single round-robin", g)
            }
            ConfigurationError::MatchOrder(n) => {
                write!(f, "Match {} is duplicated or out of order", n)
            }
            ConfigurationError::NotKnockoutRound(n) => {
                write!(f, "Knockout match {} is tagged as group stage", n)
            }
            ConfigurationError::RoundsNotContiguous(r) => {
                write!(f, "Round {:?} is split across the schedule", r)
            }
            ConfigurationError::RankOutOfRange { match_number, rank } => {
                write!(
                    f,
                    "Match {} uses qualification rank {} which does not advance",
                    match_number, rank
                )
            }
            ConfigurationError::UnresolvableSource { match_number, source } => {
                write!(
                    f,
                    "Match {} depends on match {} which is not an earlier knockout match",
                    match_number, source
                )
            }
            ConfigurationError::MissingFinal => write!(f, "Catalog has no final"),
            ConfigurationError::FinalNotLast => {
                write!(f, "The final must be the single last match")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A group and its teams in registration order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub teams: Vec<String>,
}

/// One round-robin fixture.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupFixture {
    pub number: MatchNumber,
    pub group: GroupId,
    pub team_a: String,
    pub team_b: String,
}

/// Where a knockout participant comes from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSource {
    /// Finishing position (1-based) in a group.
    GroupRank { group: GroupId, rank: usize },
    Winner(MatchNumber),
    Loser(MatchNumber),
}

/// Knockout match whose participants are resolved from their sources.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutTemplate {
    pub number: MatchNumber,
    pub round: RoundType,
    pub slot_a: SlotSource,
    pub slot_b: SlotSource,
}

/// A catalog entry in forecast order.
#[derive(Clone, Copy, Debug)]
pub enum Fixture<'a> {
    Group(&'a GroupFixture),
    Knockout(&'a KnockoutTemplate),
}

impl Fixture<'_> {
    pub fn number(&self) -> MatchNumber {
        match self {
            Fixture::Group(g) => g.number,
            Fixture::Knockout(k) => k.number,
        }
    }

    pub fn round(&self) -> RoundType {
        match self {
            Fixture::Group(_) => RoundType::GroupStage,
            Fixture::Knockout(k) => k.round,
        }
    }
}

/// Static description of the whole tournament. Construct through `from_json`,
/// `from_path` or `world_cup_2022` so that it is always validated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketCatalog {
    pub name: String,
    groups: Vec<Group>,
    group_matches: Vec<GroupFixture>,
    knockout: Vec<KnockoutTemplate>,
}

impl BracketCatalog {
    /// The built-in FIFA World Cup 2022 bracket (32 teams, 64 matches).
    pub fn world_cup_2022() -> Result<Self, ConfigurationError> {
        Self::from_json(WORLD_CUP_2022)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        catalog.validate()?;
        log::debug!(
            "Loaded catalog {:?}: {} groups, {} matches",
            catalog.name,
            catalog.groups.len(),
            catalog.match_count()
        );
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigurationError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&json)
    }

    /// Group ids in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.iter().map(|g| &g.id)
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Fixtures of one group in schedule order.
    pub fn matches_in_group<'a>(
        &'a self,
        group_id: &'a str,
    ) -> impl Iterator<Item = &'a GroupFixture> {
        self.group_matches.iter().filter(move |m| m.group == group_id)
    }

    /// Knockout templates of one round in schedule order.
    pub fn knockout_round(&self, round: RoundType) -> impl Iterator<Item = &KnockoutTemplate> {
        self.knockout.iter().filter(move |k| k.round == round)
    }

    /// The first knockout round, entered once the group stage is complete.
    pub fn knockout_round_after_groups(&self) -> impl Iterator<Item = &KnockoutTemplate> {
        let first = self.round_after(RoundType::GroupStage);
        self.knockout.iter().filter(move |k| Some(k.round) == first)
    }

    /// Round following `round`, or `None` after the final.
    pub fn round_after(&self, round: RoundType) -> Option<RoundType> {
        let rounds = self.round_order();
        rounds
            .iter()
            .position(|r| *r == round)
            .and_then(|i| rounds.get(i + 1))
            .copied()
    }

    pub fn knockout_match(&self, number: MatchNumber) -> Option<&KnockoutTemplate> {
        self.knockout.iter().find(|k| k.number == number)
    }

    /// Every match in forecast order: group stage first, then knockout rounds.
    pub fn fixtures(&self) -> impl Iterator<Item = Fixture<'_>> {
        self.group_matches
            .iter()
            .map(Fixture::Group)
            .chain(self.knockout.iter().map(Fixture::Knockout))
    }

    pub fn fixture(&self, number: MatchNumber) -> Option<Fixture<'_>> {
        self.fixtures().find(|f| f.number() == number)
    }

    pub fn match_count(&self) -> usize {
        self.group_matches.len() + self.knockout.len()
    }

    /// Number of the final, which is always the last fixture.
    pub fn final_match(&self) -> Option<&KnockoutTemplate> {
        self.knockout.last().filter(|k| k.round == RoundType::Final)
    }

    fn round_order(&self) -> Vec<RoundType> {
        let mut rounds = vec![RoundType::GroupStage];
        for k in &self.knockout {
            if rounds.last() != Some(&k.round) {
                rounds.push(k.round);
            }
        }
        rounds
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.groups.is_empty() {
            return Err(ConfigurationError::NoGroups);
        }
        let mut group_ids = HashSet::new();
        let mut teams = HashSet::new();
        for g in &self.groups {
            if g.teams.is_empty() {
                return Err(ConfigurationError::EmptyGroup(g.id.clone()));
            }
            if !group_ids.insert(g.id.as_str()) {
                return Err(ConfigurationError::DuplicateGroup(g.id.clone()));
            }
            for t in &g.teams {
                if !teams.insert(t.as_str()) {
                    return Err(ConfigurationError::DuplicateTeam(t.clone()));
                }
            }
        }

        let mut previous: Option<MatchNumber> = None;
        for f in self.fixtures() {
            let n = f.number();
            if previous.is_some_and(|p| n <= p) {
                return Err(ConfigurationError::MatchOrder(n));
            }
            previous = Some(n);
        }

        self.validate_group_stage()?;
        self.validate_knockout()
    }

    fn validate_group_stage(&self) -> Result<(), ConfigurationError> {
        let mut pairs: HashMap<&str, HashSet<(&str, &str)>> = HashMap::new();
        for m in &self.group_matches {
            let group = self
                .group(&m.group)
                .ok_or_else(|| ConfigurationError::UnknownGroup {
                    match_number: m.number,
                    group: m.group.clone(),
                })?;
            let in_group = |t: &str| group.teams.iter().any(|x| x == t);
            if m.team_a == m.team_b || !in_group(&m.team_a) || !in_group(&m.team_b) {
                return Err(ConfigurationError::InvalidFixture { match_number: m.number });
            }
            let key = if m.team_a < m.team_b {
                (m.team_a.as_str(), m.team_b.as_str())
            } else {
                (m.team_b.as_str(), m.team_a.as_str())
            };
            if !pairs.entry(group.id.as_str()).or_default().insert(key) {
                return Err(ConfigurationError::IncompleteRoundRobin(group.id.clone()));
            }
        }
        for g in &self.groups {
            let n = g.teams.len();
            let played = pairs.get(g.id.as_str()).map_or(0, |p| p.len());
            if played != n * (n - 1) / 2 {
                return Err(ConfigurationError::IncompleteRoundRobin(g.id.clone()));
            }
        }
        Ok(())
    }

    fn validate_knockout(&self) -> Result<(), ConfigurationError> {
        let mut seen_rounds: Vec<RoundType> = Vec::new();
        for (i, k) in self.knockout.iter().enumerate() {
            if !k.round.is_knockout() {
                return Err(ConfigurationError::NotKnockoutRound(k.number));
            }
            if seen_rounds.last() != Some(&k.round) {
                if seen_rounds.contains(&k.round) {
                    return Err(ConfigurationError::RoundsNotContiguous(k.round));
                }
                seen_rounds.push(k.round);
            }
            let earlier = &self.knockout[..i];
            for source in [&k.slot_a, &k.slot_b] {
                match source {
                    SlotSource::GroupRank { group, rank } => {
                        let g = self.group(group).ok_or_else(|| ConfigurationError::UnknownGroup {
                            match_number: k.number,
                            group: group.clone(),
                        })?;
                        if *rank == 0 || *rank > QUALIFIERS_PER_GROUP || *rank > g.teams.len() {
                            return Err(ConfigurationError::RankOutOfRange {
                                match_number: k.number,
                                rank: *rank,
                            });
                        }
                    }
                    SlotSource::Winner(n) | SlotSource::Loser(n) => {
                        if !earlier.iter().any(|e| e.number == *n) {
                            return Err(ConfigurationError::UnresolvableSource {
                                match_number: k.number,
                                source: *n,
                            });
                        }
                    }
                }
            }
        }

        let finals = self
            .knockout
            .iter()
            .filter(|k| k.round == RoundType::Final)
            .count();
        match finals {
            0 => Err(ConfigurationError::MissingFinal),
            1 if self.final_match().is_some() => Ok(()),
            _ => Err(ConfigurationError::FinalNotLast),
        }
    }
}
