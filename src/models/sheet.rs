//! ScoreSheet: the full game state (players + rounds) and its structural checks.

use crate::models::player::{Player, PlayerId};
use crate::models::round::Round;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Players in a fresh game.
pub const DEFAULT_PLAYER_COUNT: usize = 4;
/// Empty rounds in a fresh game.
pub const DEFAULT_ROUND_COUNT: u32 = 11;

/// Errors from building or editing a score sheet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SheetError {
    /// No player with this id on the sheet.
    UnknownPlayer(PlayerId),
    /// No round with this 1-based index.
    UnknownRound(u32),
    /// A player with this id is already seated.
    DuplicatePlayer(PlayerId),
    /// Removing this player would leave the sheet empty (at least 1 player is kept).
    LastPlayer,
    /// Round at `position` (0-based) carries the wrong index.
    RoundIndexMismatch { position: usize, index: u32 },
    /// A round has a score for a player that is not on the sheet.
    StrayScore { round: u32, player: PlayerId },
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::UnknownPlayer(id) => write!(f, "Player not found: {}", id),
            SheetError::UnknownRound(index) => write!(f, "Round {} does not exist", index),
            SheetError::DuplicatePlayer(id) => write!(f, "Player {} is already on the sheet", id),
            SheetError::LastPlayer => write!(f, "At least one player must remain"),
            SheetError::RoundIndexMismatch { position, index } => {
                write!(
                    f,
                    "Round at position {} has index {} (expected {})",
                    position,
                    index,
                    position + 1
                )
            }
            SheetError::StrayScore { round, player } => {
                write!(f, "Round {} has a score for unknown player {}", round, player)
            }
        }
    }
}

impl std::error::Error for SheetError {}

/// Players and rounds. Every edit produces a new value; old values live on in history.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    /// Display order. Not significant to ranking beyond tie-breaks.
    pub players: Vec<Player>,
    /// Ascending, contiguous, 1-based.
    pub rounds: Vec<Round>,
}

impl ScoreSheet {
    pub fn new(players: Vec<Player>, rounds: Vec<Round>) -> Self {
        Self { players, rounds }
    }

    /// The roster a new game starts with: P1..P4 and 11 empty rounds.
    pub fn default_game() -> Self {
        let players: Vec<Player> = (0..DEFAULT_PLAYER_COUNT).map(Player::next_seat).collect();
        Self::with_empty_rounds(players, DEFAULT_ROUND_COUNT)
    }

    /// `players` plus `rounds` empty rounds.
    pub fn with_empty_rounds(players: Vec<Player>, rounds: u32) -> Self {
        let rounds = (1..=rounds)
            .map(|i| Round::empty(i, players.iter().map(|p| &p.id)))
            .collect();
        Self { players, rounds }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Round by 1-based index.
    pub fn round(&self, index: u32) -> Option<&Round> {
        index
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// Check the structural invariants: unique player ids, round indices `1..=n`,
    /// every score key belongs to a seated player.
    pub fn validate(&self) -> Result<(), SheetError> {
        let mut ids = HashSet::with_capacity(self.players.len());
        for p in &self.players {
            if !ids.insert(p.id) {
                return Err(SheetError::DuplicatePlayer(p.id));
            }
        }
        for (position, round) in self.rounds.iter().enumerate() {
            if round.index as usize != position + 1 {
                return Err(SheetError::RoundIndexMismatch {
                    position,
                    index: round.index,
                });
            }
            if let Some(stray) = round.scores.keys().find(|id| !ids.contains(*id)) {
                return Err(SheetError::StrayScore {
                    round: round.index,
                    player: *stray,
                });
            }
        }
        Ok(())
    }
}
