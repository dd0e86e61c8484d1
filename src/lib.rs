//! World Cup forecast tracker: bracket catalog and the progression engine.

pub mod logic;
pub mod models;

pub use logic::{
    cancel_last, champion, final_winner, group_qualifiers, is_complete, missing_forecasts,
    next_match, predictions, progress, progress_state, rank_group, resolve_knockout_match,
    resolve_match, resolve_slot, resolve_standings, submit_forecast, submit_score, GroupResult,
    Prediction, Progress, ProgressState, TeamStanding,
};
pub use models::{
    BracketCatalog, CancelOutcome, ConfigurationError, Contest, ContestError, Fixture, Forecast,
    ForecastError, ForecastLog, Group, GroupFixture, GroupId, JoinOutcome, KnockoutTemplate, Match,
    MatchNumber, PlayerId, PlayerRecord, RoundType, Score, Side, SlotSource, MAX_GOALS,
    QUALIFIERS_PER_GROUP,
};
