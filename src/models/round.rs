//! Round and Score: one scoring cycle and the value held in each cell.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One cell of the score sheet. Serialized as JSON `null` or an integer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum Score {
    /// Not entered yet. Counts as 0 towards totals.
    #[default]
    Absent,
    Value(i64),
}

impl Score {
    pub fn value(self) -> Option<i64> {
        match self {
            Score::Absent => None,
            Score::Value(v) => Some(v),
        }
    }

    /// Contribution to a running total (absent = 0).
    pub fn points(self) -> i64 {
        self.value().unwrap_or(0)
    }

    pub fn is_absent(self) -> bool {
        self == Score::Absent
    }
}

impl From<Option<i64>> for Score {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Score::Absent, Score::Value)
    }
}

impl From<Score> for Option<i64> {
    fn from(s: Score) -> Self {
        s.value()
    }
}

/// A single round: 1-based index plus one cell per player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub index: u32,
    /// Missing keys and `Score::Absent` mean the same thing.
    pub scores: HashMap<PlayerId, Score>,
}

impl Round {
    /// Create a round with every given player mapped to absent.
    pub fn empty<'a>(index: u32, players: impl IntoIterator<Item = &'a PlayerId>) -> Self {
        Self {
            index,
            scores: players.into_iter().map(|id| (*id, Score::Absent)).collect(),
        }
    }

    /// The score entered for `player` in this round.
    pub fn score(&self, player: PlayerId) -> Score {
        self.scores.get(&player).copied().unwrap_or_default()
    }

    /// A round is played once at least one player has a value in it.
    pub fn is_played(&self) -> bool {
        self.scores.values().any(|s| !s.is_absent())
    }
}
