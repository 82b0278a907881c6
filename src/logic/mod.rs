//! Score tracker business logic: sheet edits, rankings, history, export.

mod edits;
mod export;
mod history;
mod ranking;

pub use edits::{
    add_player, add_round, parse_score_input, remove_last_round, remove_player, rename_player,
    sanitize_score_input, set_score,
};
pub use export::{to_csv_string, write_csv};
pub use history::HistoryStore;
pub use ranking::{
    cumulative_rank_timeline, cumulative_series, overall_ranks, rank_totals, round_leaders,
    total_scores, PlayerStats, PlayerTotal, RoundLeaders, RoundRanks, SeriesPoint,
};
