//! Data structures for the score tracker: players, rounds, score sheet.

mod player;
mod round;
mod sheet;

pub use player::{palette_color, Player, PlayerId, PLAYER_COLORS};
pub use round::{Round, Score};
pub use sheet::{ScoreSheet, SheetError, DEFAULT_PLAYER_COUNT, DEFAULT_ROUND_COUNT};
