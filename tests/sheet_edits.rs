//! Integration tests for score sheet edits and input sanitizing.

use okey_score_web::{
    add_player, add_round, parse_score_input, remove_last_round, remove_player, rename_player,
    sanitize_score_input, set_score, Player, Score, ScoreSheet, SheetError, DEFAULT_PLAYER_COUNT,
    DEFAULT_ROUND_COUNT, PLAYER_COLORS,
};
use uuid::Uuid;

fn game() -> ScoreSheet {
    ScoreSheet::default_game()
}

#[test]
fn default_game_has_four_players_and_eleven_empty_rounds() {
    let sheet = game();
    assert_eq!(sheet.players.len(), DEFAULT_PLAYER_COUNT);
    assert_eq!(sheet.rounds.len(), DEFAULT_ROUND_COUNT as usize);
    let names: Vec<&str> = sheet.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["P1", "P2", "P3", "P4"]);
    assert_eq!(sheet.players[3].color, PLAYER_COLORS[3]);
    for (i, round) in sheet.rounds.iter().enumerate() {
        assert_eq!(round.index as usize, i + 1);
        assert_eq!(round.scores.len(), 4);
        assert!(!round.is_played());
    }
    assert!(sheet.validate().is_ok());
}

#[test]
fn sanitize_keeps_digits_and_one_leading_minus() {
    assert_eq!(sanitize_score_input("12-3-"), "123");
    assert_eq!(sanitize_score_input("-5-"), "-5");
    assert_eq!(sanitize_score_input(" 4a2 "), "42");
    assert_eq!(sanitize_score_input("--7"), "-7");
    assert_eq!(sanitize_score_input("abc"), "");
}

#[test]
fn bare_minus_and_empty_input_are_absent() {
    assert_eq!(parse_score_input(""), Some(Score::Absent));
    assert_eq!(parse_score_input("-"), Some(Score::Absent));
    assert_eq!(parse_score_input("x-"), Some(Score::Absent));
    assert_eq!(parse_score_input("-12"), Some(Score::Value(-12)));
    assert_eq!(parse_score_input("99999999999999999999999"), None);
}

#[test]
fn set_score_stores_value_and_leaves_input_untouched() {
    let sheet = game();
    let p2 = sheet.players[1].id;
    let next = set_score(&sheet, 3, p2, "1x5").unwrap();
    assert_eq!(next.round(3).unwrap().score(p2), Score::Value(15));
    assert_eq!(sheet.round(3).unwrap().score(p2), Score::Absent);

    let cleared = set_score(&next, 3, p2, "").unwrap();
    assert_eq!(cleared.round(3).unwrap().score(p2), Score::Absent);
}

#[test]
fn set_score_overflow_keeps_previous_value() {
    let sheet = game();
    let p1 = sheet.players[0].id;
    let sheet = set_score(&sheet, 1, p1, "8").unwrap();
    let next = set_score(&sheet, 1, p1, "123456789012345678901234").unwrap();
    assert_eq!(next.round(1).unwrap().score(p1), Score::Value(8));
}

#[test]
fn set_score_rejects_unknown_round_or_player() {
    let sheet = game();
    let p1 = sheet.players[0].id;
    assert_eq!(
        set_score(&sheet, 0, p1, "1"),
        Err(SheetError::UnknownRound(0))
    );
    assert_eq!(
        set_score(&sheet, 12, p1, "1"),
        Err(SheetError::UnknownRound(12))
    );
    let stranger = Uuid::new_v4();
    assert_eq!(
        set_score(&sheet, 1, stranger, "1"),
        Err(SheetError::UnknownPlayer(stranger))
    );
}

#[test]
fn rename_changes_only_the_name() {
    let sheet = game();
    let p1 = sheet.players[0].id;
    let next = rename_player(&sheet, p1, "Ayşe").unwrap();
    assert_eq!(next.players[0].name, "Ayşe");
    assert_eq!(next.players[0].id, p1);
    assert_eq!(next.players[0].color, sheet.players[0].color);
    assert_eq!(next.rounds, sheet.rounds);
}

#[test]
fn add_player_backfills_absent_cells() {
    let sheet = game();
    let newcomer = Player::next_seat(sheet.players.len());
    assert_eq!(newcomer.name, "P5");
    assert_eq!(newcomer.color, PLAYER_COLORS[4]);
    let id = newcomer.id;

    let next = add_player(&sheet, newcomer.clone()).unwrap();
    assert_eq!(next.players.last().unwrap().id, id);
    for round in &next.rounds {
        assert_eq!(round.scores.get(&id), Some(&Score::Absent));
    }
    assert!(next.validate().is_ok());

    assert_eq!(
        add_player(&next, newcomer),
        Err(SheetError::DuplicatePlayer(id))
    );
}

#[test]
fn palette_cycles_by_player_count() {
    assert_eq!(Player::next_seat(7).color, PLAYER_COLORS[0]);
    assert_eq!(Player::next_seat(9).color, PLAYER_COLORS[2]);
}

#[test]
fn add_then_remove_player_restores_the_sheet() {
    let sheet = game();
    let p1 = sheet.players[0].id;
    let p3 = sheet.players[2].id;
    let sheet = set_score(&sheet, 1, p1, "5").unwrap();
    let sheet = set_score(&sheet, 2, p3, "-20").unwrap();

    let newcomer = Player::next_seat(sheet.players.len());
    let id = newcomer.id;
    let with = add_player(&sheet, newcomer).unwrap();
    let with = set_score(&with, 1, id, "9").unwrap();
    let without = remove_player(&with, id).unwrap();

    assert_eq!(without, sheet);
}

#[test]
fn remove_player_keeps_at_least_one() {
    let sheet = ScoreSheet::with_empty_rounds(vec![Player::next_seat(0), Player::next_seat(1)], 2);
    let (a, b) = (sheet.players[0].id, sheet.players[1].id);
    let one_left = remove_player(&sheet, a).unwrap();
    assert_eq!(one_left.players.len(), 1);
    assert!(one_left.rounds.iter().all(|r| !r.scores.contains_key(&a)));
    assert_eq!(remove_player(&one_left, b), Err(SheetError::LastPlayer));
}

#[test]
fn rounds_stay_contiguous() {
    let sheet = game();
    let grown = add_round(&sheet);
    assert_eq!(grown.rounds.len(), 12);
    assert_eq!(grown.rounds[11].index, 12);
    assert_eq!(grown.rounds[11].scores.len(), 4);

    let shrunk = remove_last_round(&grown).unwrap();
    assert_eq!(shrunk, sheet);
    assert!(shrunk.validate().is_ok());
}

#[test]
fn remove_last_round_on_empty_sheet_is_a_no_op() {
    let sheet = ScoreSheet::with_empty_rounds(vec![Player::next_seat(0)], 0);
    assert!(remove_last_round(&sheet).is_none());
}

#[test]
fn validate_catches_broken_sheets() {
    let mut sheet = game();
    sheet.rounds[2].index = 7;
    assert!(matches!(
        sheet.validate(),
        Err(SheetError::RoundIndexMismatch { position: 2, index: 7 })
    ));

    let mut sheet = game();
    let stray = Uuid::new_v4();
    sheet.rounds[0].scores.insert(stray, Score::Value(1));
    assert_eq!(
        sheet.validate(),
        Err(SheetError::StrayScore { round: 1, player: stray })
    );
}
