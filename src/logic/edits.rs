//! Score sheet edits: each takes the current sheet and returns the next one, leaving the input untouched.

use crate::models::{Player, PlayerId, Round, Score, ScoreSheet, SheetError};

/// Strip everything except digits and minus signs; only a leading `-` survives.
///
/// `"1a2"` → `"12"`, `"-5-"` → `"-5"`, `"12-3-"` → `"123"`.
pub fn sanitize_score_input(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().filter(|c| c.is_ascii_digit() || *c == '-') {
        if c == '-' && !out.is_empty() {
            continue;
        }
        out.push(c);
    }
    out
}

/// Turn raw cell text into a score.
///
/// Empty input and a bare `-` (a negative number still being typed) are absent.
/// Returns `None` when the digits do not fit an `i64`; the caller keeps the old value.
pub fn parse_score_input(raw: &str) -> Option<Score> {
    let sanitized = sanitize_score_input(raw);
    if sanitized.is_empty() || sanitized == "-" {
        return Some(Score::Absent);
    }
    sanitized.parse::<i64>().ok().map(Score::Value)
}

/// Set one cell from raw user input.
pub fn set_score(
    sheet: &ScoreSheet,
    round_index: u32,
    player_id: PlayerId,
    raw_input: &str,
) -> Result<ScoreSheet, SheetError> {
    if !sheet.has_player(player_id) {
        return Err(SheetError::UnknownPlayer(player_id));
    }
    if sheet.round(round_index).is_none() {
        return Err(SheetError::UnknownRound(round_index));
    }
    let mut next = sheet.clone();
    if let Some(score) = parse_score_input(raw_input) {
        let round = &mut next.rounds[round_index as usize - 1];
        round.scores.insert(player_id, score);
    } else {
        log::debug!("Ignoring unparseable score input {:?}", raw_input);
    }
    Ok(next)
}

/// Change a player's display name.
pub fn rename_player(
    sheet: &ScoreSheet,
    player_id: PlayerId,
    new_name: impl Into<String>,
) -> Result<ScoreSheet, SheetError> {
    let mut next = sheet.clone();
    let player = next
        .players
        .iter_mut()
        .find(|p| p.id == player_id)
        .ok_or(SheetError::UnknownPlayer(player_id))?;
    player.name = new_name.into();
    Ok(next)
}

/// Append a player and backfill an absent cell for them in every existing round.
pub fn add_player(sheet: &ScoreSheet, new_player: Player) -> Result<ScoreSheet, SheetError> {
    if sheet.has_player(new_player.id) {
        return Err(SheetError::DuplicatePlayer(new_player.id));
    }
    let mut next = sheet.clone();
    for round in &mut next.rounds {
        round.scores.insert(new_player.id, Score::Absent);
    }
    next.players.push(new_player);
    Ok(next)
}

/// Remove a player and their cell from every round. The last remaining player cannot be removed.
pub fn remove_player(sheet: &ScoreSheet, player_id: PlayerId) -> Result<ScoreSheet, SheetError> {
    if !sheet.has_player(player_id) {
        return Err(SheetError::UnknownPlayer(player_id));
    }
    if sheet.players.len() <= 1 {
        return Err(SheetError::LastPlayer);
    }
    let mut next = sheet.clone();
    next.players.retain(|p| p.id != player_id);
    for round in &mut next.rounds {
        round.scores.remove(&player_id);
    }
    Ok(next)
}

/// Append an empty round numbered after the current last one.
pub fn add_round(sheet: &ScoreSheet) -> ScoreSheet {
    let mut next = sheet.clone();
    let index = next.rounds.len() as u32 + 1;
    let round = Round::empty(index, sheet.players.iter().map(|p| &p.id));
    next.rounds.push(round);
    next
}

/// Drop the highest-indexed round. `None` when there are no rounds (nothing to commit).
pub fn remove_last_round(sheet: &ScoreSheet) -> Option<ScoreSheet> {
    if sheet.rounds.is_empty() {
        return None;
    }
    let mut next = sheet.clone();
    next.rounds.pop();
    Some(next)
}
