//! Data structures for the forecast tracker: catalog, matches, forecasts, contests.

mod catalog;
mod contest;
mod forecast;
mod game;
mod player;

pub use catalog::{
    BracketCatalog, ConfigurationError, Fixture, Group, GroupFixture, KnockoutTemplate,
    SlotSource, QUALIFIERS_PER_GROUP,
};
pub use contest::{Contest, ContestError, JoinOutcome};
pub use forecast::{CancelOutcome, Forecast, ForecastError, ForecastLog};
pub use game::{GroupId, Match, MatchNumber, RoundType, Score, Side, MAX_GOALS};
pub use player::{PlayerId, PlayerRecord};
