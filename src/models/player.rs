//! Player data structure and the colour palette new players cycle through.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used as the key in every round's score map).
pub type PlayerId = Uuid;

/// Display colours handed out to players, cycled by player count.
pub const PLAYER_COLORS: [&str; 7] = [
    "#6366f1", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4",
];

/// A player on the score sheet. Only `id` matters for ranking; `name` and `color` are display-only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
}

impl Player {
    /// Create a new player with a fresh id.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// The player the "add player" button appends when `existing` players are already seated:
    /// named `P{n+1}` and coloured by `n` modulo the palette size.
    pub fn next_seat(existing: usize) -> Self {
        Self::new(format!("P{}", existing + 1), palette_color(existing))
    }
}

/// Palette colour for the player at position `index`.
pub fn palette_color(index: usize) -> &'static str {
    PLAYER_COLORS[index % PLAYER_COLORS.len()]
}
