//! Standings: totals, overall ranks, per-round cumulative ranks and chart series.
//!
//! Lowest total wins. Ties are not shared: tied players get consecutive ranks in player
//! order (the first-listed player gets the better rank).

use crate::models::{PlayerId, ScoreSheet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A player's running or final total.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotal {
    pub player_id: PlayerId,
    pub total: i64,
}

/// Standing of one player (for API / display and the insight prompt).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub id: PlayerId,
    pub name: String,
    pub total_score: i64,
    /// 1-based, 1 = lowest total.
    pub rank: usize,
}

/// Ranks for one round of the timeline. `ranks` is `None` when nobody scored in that round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRanks {
    pub round: u32,
    pub ranks: Option<HashMap<PlayerId, usize>>,
}

/// One chart point: every player's running total after `round`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub round: u32,
    pub label: String,
    pub totals: Vec<PlayerTotal>,
}

/// Players holding the lowest entered score of one round (highlighted in the table).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundLeaders {
    pub round: u32,
    /// Empty when nobody has scored in the round.
    pub players: Vec<PlayerId>,
}

/// Sum of each player's entered scores across all rounds (absent = 0), in player order.
pub fn total_scores(sheet: &ScoreSheet) -> Vec<PlayerTotal> {
    sheet
        .players
        .iter()
        .map(|p| PlayerTotal {
            player_id: p.id,
            total: sheet.rounds.iter().map(|r| r.score(p.id).points()).sum(),
        })
        .collect()
}

/// Rank totals ascending. The sort is stable so ties keep their input order.
pub fn rank_totals(totals: &[PlayerTotal]) -> HashMap<PlayerId, usize> {
    let mut sorted: Vec<&PlayerTotal> = totals.iter().collect();
    sorted.sort_by_key(|t| t.total);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, t)| (t.player_id, i + 1))
        .collect()
}

/// Total and overall rank for every player, in player order.
pub fn overall_ranks(sheet: &ScoreSheet) -> Vec<PlayerStats> {
    let totals = total_scores(sheet);
    let ranks = rank_totals(&totals);
    sheet
        .players
        .iter()
        .zip(totals)
        .map(|(p, t)| PlayerStats {
            id: p.id,
            name: p.name.clone(),
            total_score: t.total,
            rank: ranks[&p.id],
        })
        .collect()
}

/// Cumulative running totals after each round, one entry per round in order.
fn running_totals(sheet: &ScoreSheet) -> Vec<Vec<PlayerTotal>> {
    let mut running: Vec<PlayerTotal> = sheet
        .players
        .iter()
        .map(|p| PlayerTotal {
            player_id: p.id,
            total: 0,
        })
        .collect();
    sheet
        .rounds
        .iter()
        .map(|round| {
            for t in &mut running {
                t.total += round.score(t.player_id).points();
            }
            running.clone()
        })
        .collect()
}

/// Per-round rank progression based on cumulative totals through each round.
///
/// A round where nobody has a score gets no ranks, even if later rounds are played;
/// there is no carry-forward of the previous round's ranks.
pub fn cumulative_rank_timeline(sheet: &ScoreSheet) -> Vec<RoundRanks> {
    sheet
        .rounds
        .iter()
        .zip(running_totals(sheet))
        .map(|(round, totals)| RoundRanks {
            round: round.index,
            ranks: round.is_played().then(|| rank_totals(&totals)),
        })
        .collect()
}

/// Running totals for charting. Includes every round, played or not.
pub fn cumulative_series(sheet: &ScoreSheet) -> Vec<SeriesPoint> {
    sheet
        .rounds
        .iter()
        .zip(running_totals(sheet))
        .map(|(round, totals)| SeriesPoint {
            round: round.index,
            label: format!("R{}", round.index),
            totals,
        })
        .collect()
}

/// For each round, the players whose entered score equals the round's minimum, in player order.
pub fn round_leaders(sheet: &ScoreSheet) -> Vec<RoundLeaders> {
    sheet
        .rounds
        .iter()
        .map(|round| {
            let best = sheet
                .players
                .iter()
                .filter_map(|p| round.score(p.id).value())
                .min();
            let players = match best {
                Some(best) => sheet
                    .players
                    .iter()
                    .filter(|p| round.score(p.id).value() == Some(best))
                    .map(|p| p.id)
                    .collect(),
                None => Vec::new(),
            };
            RoundLeaders {
                round: round.index,
                players,
            }
        })
        .collect()
}
