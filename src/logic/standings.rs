//! Group stage: standings tables and qualification from forecast results.

use crate::models::{BracketCatalog, ForecastLog, Score, QUALIFIERS_PER_GROUP};
use serde::Serialize;
use std::cmp::Ordering;

const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_DRAW: u32 = 1;

/// One row of a group table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    /// Wide enough that summing any `Score` values cannot overflow.
    pub goals_for: u64,
    pub goals_against: u64,
    pub points: u32,
}

impl TeamStanding {
    fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i128 {
        i128::from(self.goals_for) - i128::from(self.goals_against)
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += u64::from(scored);
        self.goals_against += u64::from(conceded);
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            Ordering::Less => self.lost += 1,
        }
    }
}

/// A forecast group result: (team A, team B, score).
pub type GroupResult<'a> = (&'a str, &'a str, Score);

fn compare_points(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points.cmp(&a.points)
}

fn compare_goal_difference(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.goal_difference().cmp(&a.goal_difference())
}

fn compare_goals_scored(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.goals_for.cmp(&a.goals_for)
}

fn compare_overall(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    compare_points(a, b)
        .then_with(|| compare_goal_difference(a, b))
        .then_with(|| compare_goals_scored(a, b))
}

/// Tally results between the given teams only, in the order of `teams`.
fn tally(teams: &[&str], results: &[GroupResult<'_>]) -> Vec<TeamStanding> {
    let mut table: Vec<TeamStanding> = teams.iter().map(|t| TeamStanding::new(t)).collect();
    for &(team_a, team_b, score) in results {
        let a = table.iter().position(|s| s.team == team_a);
        let b = table.iter().position(|s| s.team == team_b);
        if let (Some(a), Some(b)) = (a, b) {
            table[a].record(score.a, score.b);
            table[b].record(score.b, score.a);
        }
    }
    table
}

/// Rank a group from its results.
///
/// Order: points, goal difference, goals scored, then points in the mini-league
/// played only among the teams still level. Teams level after that keep the
/// order of `teams` (catalog registration order). The result does not depend on
/// the order of `results`.
pub fn rank_group(teams: &[&str], results: &[GroupResult<'_>]) -> Vec<TeamStanding> {
    let mut table = tally(teams, results);
    // Stable sort: exact ties keep registration order.
    table.sort_by(compare_overall);

    let mut start = 0;
    while start < table.len() {
        let end = start
            + table[start..]
                .iter()
                .take_while(|s| compare_overall(&table[start], s) == Ordering::Equal)
                .count();
        if end - start > 1 {
            let tied: Vec<&str> = table[start..end].iter().map(|s| s.team.as_str()).collect();
            let mini = tally(&tied, results);
            let mini_points = |team: &str| {
                mini.iter()
                    .find(|s| s.team == team)
                    .map_or(0, |s| s.points)
            };
            log::debug!("Mini-league between {:?}", tied);
            table[start..end].sort_by(|a, b| mini_points(&b.team).cmp(&mini_points(&a.team)));
        }
        start = end;
    }
    table
}

/// Standings of a catalog group, or `None` until all of its matches have a forecast.
pub fn resolve_standings(
    catalog: &BracketCatalog,
    group_id: &str,
    log: &ForecastLog,
) -> Option<Vec<TeamStanding>> {
    let group = catalog.group(group_id)?;
    let mut results = Vec::new();
    for m in catalog.matches_in_group(group_id) {
        let score = log.score_for(m.number)?;
        results.push((m.team_a.as_str(), m.team_b.as_str(), score));
    }
    let teams: Vec<&str> = group.teams.iter().map(String::as_str).collect();
    let table = rank_group(&teams, &results);
    log::debug!(
        "Group {} resolved: {:?}",
        group_id,
        table.iter().map(|s| s.team.as_str()).collect::<Vec<_>>()
    );
    Some(table)
}

/// Teams advancing from a group, best first.
pub fn group_qualifiers(
    catalog: &BracketCatalog,
    group_id: &str,
    log: &ForecastLog,
) -> Option<Vec<String>> {
    let table = resolve_standings(catalog, group_id, log)?;
    Some(
        table
            .into_iter()
            .take(QUALIFIERS_PER_GROUP)
            .map(|s| s.team)
            .collect(),
    )
}
