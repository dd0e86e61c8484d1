//! Tournament business logic: standings, knockout resolution, progression.

mod knockout;
mod overview;
mod progression;
mod standings;

pub use knockout::{final_winner, resolve_knockout_match, resolve_match, resolve_slot};
pub use overview::{missing_forecasts, predictions, Prediction};
pub use progression::{
    cancel_last, champion, is_complete, next_match, progress, progress_state, submit_forecast,
    submit_score, Progress, ProgressState,
};
pub use standings::{group_qualifiers, rank_group, resolve_standings, GroupResult, TeamStanding};
