//! Game session: one history plus the commentary state, with one method per dashboard action.

use crate::insight::{request_insight, InsightProvider, InsightRequest, InsightState};
use crate::logic::{
    add_player, add_round, cumulative_rank_timeline, cumulative_series, overall_ranks,
    remove_last_round, remove_player, rename_player, round_leaders, set_score, HistoryStore,
    PlayerStats, RoundLeaders, RoundRanks, SeriesPoint,
};
use crate::models::{Player, PlayerId, Round, ScoreSheet, SheetError};
use crate::storage::SheetStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the dashboard renders, computed from the current snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub stats: Vec<PlayerStats>,
    pub rank_timeline: Vec<RoundRanks>,
    pub series: Vec<SeriesPoint>,
    pub round_leaders: Vec<RoundLeaders>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub insight: InsightState,
}

#[derive(Debug)]
pub struct GameSession<S: SheetStore> {
    history: HistoryStore<S>,
    insight: InsightState,
    /// Timestamp of the newest commentary request; each request gets a strictly later one.
    last_requested_at: Option<DateTime<Utc>>,
}

impl<S: SheetStore> GameSession<S> {
    /// Resume from the store's snapshot, or start the default game.
    pub fn open(store: S) -> Self {
        Self::from_history(HistoryStore::open(store))
    }

    pub fn from_history(history: HistoryStore<S>) -> Self {
        Self {
            history,
            insight: InsightState::Idle,
            last_requested_at: None,
        }
    }

    pub fn sheet(&self) -> &ScoreSheet {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn insight(&self) -> &InsightState {
        &self.insight
    }

    /// Commit `next` unless it equals the current sheet. Returns whether anything was committed.
    fn apply(&mut self, next: ScoreSheet) -> bool {
        if &next == self.history.current() {
            return false;
        }
        self.history.commit(next);
        true
    }

    pub fn set_score(
        &mut self,
        round_index: u32,
        player_id: PlayerId,
        raw_input: &str,
    ) -> Result<bool, SheetError> {
        let next = set_score(self.sheet(), round_index, player_id, raw_input)?;
        Ok(self.apply(next))
    }

    pub fn rename_player(
        &mut self,
        player_id: PlayerId,
        new_name: impl Into<String>,
    ) -> Result<bool, SheetError> {
        let next = rename_player(self.sheet(), player_id, new_name)?;
        Ok(self.apply(next))
    }

    /// Seat a new player named and coloured after the current player count.
    pub fn add_player(&mut self) -> Result<PlayerId, SheetError> {
        let player = Player::next_seat(self.sheet().players.len());
        let id = player.id;
        let next = add_player(self.sheet(), player)?;
        self.apply(next);
        Ok(id)
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<bool, SheetError> {
        let next = remove_player(self.sheet(), player_id)?;
        Ok(self.apply(next))
    }

    pub fn add_round(&mut self) -> bool {
        let next = add_round(self.sheet());
        self.apply(next)
    }

    /// No-op (nothing committed) when there are no rounds.
    pub fn remove_last_round(&mut self) -> bool {
        match remove_last_round(self.sheet()) {
            Some(next) => self.apply(next),
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Start over with the default game; history, stored snapshot and commentary are discarded.
    pub fn new_game(&mut self) {
        self.history.reset(ScoreSheet::default_game());
        self.insight = InsightState::Idle;
    }

    /// Capture the current standings and mark commentary as pending.
    /// `None` (state unchanged) when there are no players or rounds, or when a request is
    /// already in flight.
    pub fn begin_insight(&mut self) -> Option<(InsightRequest, DateTime<Utc>)> {
        if self.insight.is_pending() {
            return None;
        }
        let request = InsightRequest::from_sheet(self.sheet())?;
        let now = Utc::now();
        let requested_at = match self.last_requested_at {
            Some(last) if now <= last => last + chrono::Duration::nanoseconds(1),
            _ => now,
        };
        self.last_requested_at = Some(requested_at);
        self.insight = InsightState::Pending { requested_at };
        Some((request, requested_at))
    }

    /// Store the commentary for the request made at `requested_at`.
    /// Dropped (returns false) unless that request is the one still pending.
    pub fn finish_insight(&mut self, text: String, requested_at: DateTime<Utc>) -> bool {
        match self.insight {
            InsightState::Pending { requested_at: pending } if pending == requested_at => {
                self.insight = InsightState::Ready { text, requested_at };
                true
            }
            _ => {
                log::debug!("Dropping commentary for request made at {}", requested_at);
                false
            }
        }
    }

    /// Request commentary and wait for it while holding the session.
    /// Callers sharing the session should use `begin_insight`/`finish_insight` around the await
    /// instead.
    pub async fn refresh_insight<P: InsightProvider>(&mut self, provider: &P) -> bool {
        let Some((request, requested_at)) = self.begin_insight() else {
            return false;
        };
        let text = request_insight(provider, &request).await;
        self.finish_insight(text, requested_at)
    }

    pub fn dashboard(&self) -> DashboardView {
        let sheet = self.sheet();
        DashboardView {
            players: sheet.players.clone(),
            rounds: sheet.rounds.clone(),
            stats: overall_ranks(sheet),
            rank_timeline: cumulative_rank_timeline(sheet),
            series: cumulative_series(sheet),
            round_leaders: round_leaders(sheet),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            insight: self.insight.clone(),
        }
    }
}
