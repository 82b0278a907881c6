//! Okey 101 score tracker: library with models, ranking/history logic, storage and commentary.

pub mod insight;
pub mod logic;
pub mod models;
pub mod session;
pub mod storage;

pub use insight::{
    build_prompt, request_insight, GeminiProvider, InsightProvider, InsightRequest, InsightState,
    ProviderError, FALLBACK_INSIGHT,
};
pub use logic::{
    add_player, add_round, cumulative_rank_timeline, cumulative_series, overall_ranks,
    parse_score_input, rank_totals, remove_last_round, remove_player, rename_player,
    round_leaders, sanitize_score_input, set_score, to_csv_string, total_scores, write_csv,
    HistoryStore, PlayerStats, PlayerTotal, RoundLeaders, RoundRanks, SeriesPoint,
};
pub use models::{
    palette_color, Player, PlayerId, Round, Score, ScoreSheet, SheetError, DEFAULT_PLAYER_COUNT,
    DEFAULT_ROUND_COUNT, PLAYER_COLORS,
};
pub use session::{DashboardView, GameSession};
pub use storage::{JsonFileStore, MemoryStore, SheetStore, StoreError};
