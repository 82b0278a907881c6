//! Integration tests for the game session: dashboard actions, commentary, CSV export.

use okey_score_web::{
    request_insight, to_csv_string, GameSession, GeminiProvider, InsightProvider, InsightRequest,
    InsightState, MemoryStore, ProviderError, SheetError, FALLBACK_INSIGHT,
};

struct Canned(Result<String, ProviderError>);

impl InsightProvider for Canned {
    async fn summarize(&self, _request: &InsightRequest) -> Result<String, ProviderError> {
        self.0.clone()
    }
}

fn session() -> GameSession<MemoryStore> {
    GameSession::open(MemoryStore::new())
}

#[test]
fn edits_commit_and_no_op_edits_do_not() {
    let mut s = session();
    let p1 = s.sheet().players[0].id;

    assert!(s.set_score(1, p1, "12").unwrap());
    assert_eq!(s.history().len(), 2);

    // Same value again, and a bare minus on an empty cell: nothing changes.
    assert!(!s.set_score(1, p1, "12").unwrap());
    assert!(!s.set_score(2, p1, "-").unwrap());
    assert_eq!(s.history().len(), 2);
}

#[test]
fn remove_last_round_with_no_rounds_commits_nothing() {
    let mut s = session();
    while s.remove_last_round() {}
    assert!(s.sheet().rounds.is_empty());
    let len = s.history().len();
    assert!(!s.remove_last_round());
    assert_eq!(s.history().len(), len);
}

#[test]
fn add_and_remove_players_through_the_session() {
    let mut s = session();
    let id = s.add_player().unwrap();
    assert_eq!(s.sheet().players.len(), 5);
    assert_eq!(s.sheet().player(id).unwrap().name, "P5");

    assert!(s.remove_player(id).unwrap());
    let ids: Vec<_> = s.sheet().player_ids().collect();
    for pid in &ids[1..] {
        s.remove_player(*pid).unwrap();
    }
    assert_eq!(s.remove_player(ids[0]), Err(SheetError::LastPlayer));
}

#[test]
fn dashboard_reflects_undo_and_redo() {
    let mut s = session();
    let p2 = s.sheet().players[1].id;
    s.set_score(1, p2, "-4").unwrap();

    let view = s.dashboard();
    assert!(view.can_undo);
    assert!(!view.can_redo);
    assert_eq!(view.stats[1].rank, 1);
    assert_eq!(view.stats[1].total_score, -4);
    assert!(view.rank_timeline[0].ranks.is_some());
    assert_eq!(view.series.len(), 11);
    assert_eq!(view.round_leaders[0].players, vec![p2]);

    s.undo();
    let view = s.dashboard();
    assert!(view.can_redo);
    assert_eq!(view.stats[1].total_score, 0);
    assert!(view.rank_timeline[0].ranks.is_none());
}

#[test]
fn new_game_discards_history_and_store() {
    let store = MemoryStore::new();
    let mut s = GameSession::open(store.clone());
    let p1 = s.sheet().players[0].id;
    s.set_score(1, p1, "5").unwrap();
    s.rename_player(p1, "Mehmet").unwrap();

    s.new_game();
    assert_eq!(s.history().len(), 1);
    assert_eq!(s.sheet().players[0].name, "P1");
    assert_eq!(s.insight(), &InsightState::Idle);
    assert!(GameSession::open(store).sheet().players[0].name == "P1");
}

#[tokio::test]
async fn insight_success_is_stored() {
    let mut s = session();
    let provider = Canned(Ok("P1 is cruising.".to_string()));
    assert!(s.refresh_insight(&provider).await);
    match s.insight() {
        InsightState::Ready { text, .. } => assert_eq!(text, "P1 is cruising."),
        other => panic!("unexpected insight state: {:?}", other),
    }
}

#[tokio::test]
async fn insight_failure_becomes_fallback_text() {
    let provider = Canned(Err(ProviderError::Status(503)));
    let request = InsightRequest::from_sheet(session().sheet()).unwrap();
    assert_eq!(request_insight(&provider, &request).await, FALLBACK_INSIGHT);
}

#[tokio::test]
async fn missing_api_key_falls_back_without_network() {
    let provider = GeminiProvider::new(None, "test-model", "http://127.0.0.1:9").unwrap();
    assert!(!provider.has_api_key());
    let request = InsightRequest::from_sheet(session().sheet()).unwrap();
    assert_eq!(
        provider.summarize(&request).await,
        Err(ProviderError::MissingApiKey)
    );
    assert_eq!(request_insight(&provider, &request).await, FALLBACK_INSIGHT);
}

#[tokio::test]
async fn late_insight_describes_the_captured_standings() {
    let mut s = session();
    let p1 = s.sheet().players[0].id;
    let (request, requested_at) = s.begin_insight().unwrap();
    assert!(s.insight().is_pending());

    // The table keeps changing while the request is out.
    s.set_score(1, p1, "25").unwrap();
    assert!(s.insight().is_pending());

    assert_eq!(request.stats[0].total_score, 0);
    let text = request_insight(&Canned(Ok("All square.".to_string())), &request).await;
    assert!(s.finish_insight(text, requested_at));

    assert_eq!(
        s.insight(),
        &InsightState::Ready {
            text: "All square.".to_string(),
            requested_at
        }
    );
    assert_eq!(s.dashboard().stats[0].total_score, 25);
}

#[test]
fn second_insight_request_waits_for_the_first() {
    let mut s = session();
    let (_, first_at) = s.begin_insight().unwrap();
    assert!(s.begin_insight().is_none());
    assert_eq!(s.insight(), &InsightState::Pending { requested_at: first_at });

    assert!(s.finish_insight("First take.".to_string(), first_at));
    assert!(!s.insight().is_pending());
    assert!(s.begin_insight().is_some());
}

#[test]
fn stale_insight_does_not_replace_the_pending_request() {
    let mut s = session();
    let (_, first_at) = s.begin_insight().unwrap();
    s.finish_insight("First take.".to_string(), first_at);

    let (_, second_at) = s.begin_insight().unwrap();
    assert!(second_at > first_at);
    // A duplicate answer for the first request arrives while the second is in flight.
    assert!(!s.finish_insight("First take, again.".to_string(), first_at));
    assert_eq!(s.insight(), &InsightState::Pending { requested_at: second_at });

    assert!(s.finish_insight("Second take.".to_string(), second_at));
    assert_eq!(
        s.insight(),
        &InsightState::Ready {
            text: "Second take.".to_string(),
            requested_at: second_at
        }
    );
}

#[test]
fn insight_finishing_after_new_game_is_dropped() {
    let mut s = session();
    let (_, requested_at) = s.begin_insight().unwrap();
    s.new_game();
    assert!(!s.finish_insight("Too late.".to_string(), requested_at));
    assert_eq!(s.insight(), &InsightState::Idle);
}

#[test]
fn insight_needs_players_and_rounds() {
    let mut s = session();
    while s.remove_last_round() {}
    assert!(s.begin_insight().is_none());
    assert_eq!(s.insight(), &InsightState::Idle);
}

#[test]
fn csv_export_lists_rounds_and_totals() {
    let mut s = session();
    let (p1, p2) = (s.sheet().players[0].id, s.sheet().players[1].id);
    while s.sheet().rounds.len() > 2 {
        s.remove_last_round();
    }
    s.set_score(1, p1, "10").unwrap();
    s.set_score(2, p1, "-5").unwrap();
    s.set_score(1, p2, "3").unwrap();
    s.rename_player(p2, "Zeynep, Jr").unwrap();

    let csv = to_csv_string(s.sheet()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Round,P1,\"Zeynep, Jr\",P3,P4");
    assert_eq!(lines[1], "1,10,3,,");
    assert_eq!(lines[2], "2,-5,,,");
    assert_eq!(lines[3], "Total,5,3,0,0");
}
