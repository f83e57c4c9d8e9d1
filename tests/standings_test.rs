use chrono::{TimeZone, Utc};

use football_league_backend::league::standings::compute_standings;
use football_league_backend::models::matches::{Match, MatchStatus};
use football_league_backend::models::team::Team;

fn team(id: i64, name: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        logo_url: String::new(),
        year_founded: None,
        address: String::new(),
        city: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

fn game(id: i64, home: i64, away: i64, status: MatchStatus) -> Match {
    let kick_off = Utc.with_ymd_and_hms(2025, 3, 1, 15, 0, 0).unwrap() + chrono::Duration::days(id);
    Match {
        id,
        match_date_time: kick_off,
        home_team_id: home,
        away_team_id: away,
        status,
        created_at: kick_off,
        updated_at: kick_off,
    }
}

#[test]
fn teams_without_matches_still_get_a_row() {
    let table = compute_standings(&[team(1, "Persib"), team(2, "Persija")], &[], &[]);

    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|row| row.played == 0 && row.points == 0));
    assert_eq!(table[0].team_id, 1);
    assert_eq!(table[0].position, 1);
    assert_eq!(table[1].position, 2);
}

#[test]
fn points_and_goal_difference_follow_results() {
    let teams = [team(1, "Persib"), team(2, "Persija"), team(3, "Arema")];
    let matches = [
        // 1 beats 2 by 2-1
        game(10, 1, 2, MatchStatus::HomeWin),
        // 3 and 1 draw 1-1
        game(11, 3, 1, MatchStatus::Draw),
        // 2 beats 3 away 0-3
        game(12, 3, 2, MatchStatus::Finished),
    ];
    let goals = [
        (10, 1),
        (10, 1),
        (10, 2),
        (11, 3),
        (11, 1),
        (12, 2),
        (12, 2),
        (12, 2),
    ];

    let table = compute_standings(&teams, &matches, &goals);

    let persib = table.iter().find(|r| r.team_id == 1).unwrap();
    assert_eq!((persib.played, persib.wins, persib.draws, persib.losses), (2, 1, 1, 0));
    assert_eq!((persib.goals_for, persib.goals_against), (3, 2));
    assert_eq!(persib.points, 4);

    let persija = table.iter().find(|r| r.team_id == 2).unwrap();
    assert_eq!((persija.wins, persija.losses), (1, 1));
    assert_eq!(persija.goal_difference, 2);
    assert_eq!(persija.points, 3);

    let arema = table.iter().find(|r| r.team_id == 3).unwrap();
    assert_eq!(arema.points, 1);
    assert_eq!(arema.goal_difference, -3);

    let order: Vec<i64> = table.iter().map(|r| r.team_id).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn unfinished_matches_do_not_count() {
    let teams = [team(1, "Persib"), team(2, "Persija")];
    let matches = [
        game(1, 1, 2, MatchStatus::Scheduled),
        game(2, 1, 2, MatchStatus::InProgress),
        game(3, 1, 2, MatchStatus::Cancelled),
    ];
    let goals = [(2, 1), (3, 2)];

    let table = compute_standings(&teams, &matches, &goals);
    assert!(table.iter().all(|row| row.played == 0 && row.goals_for == 0));
}

#[test]
fn ties_break_on_goal_difference_then_goals_scored_then_id() {
    let teams = [team(1, "A"), team(2, "B"), team(3, "C"), team(4, "D")];
    let matches = [
        // 4 wins 3-2, 3 wins 1-0: same points, 4 has the same difference but more goals
        game(1, 4, 1, MatchStatus::HomeWin),
        game(2, 3, 2, MatchStatus::HomeWin),
    ];
    let goals = [(1, 4), (1, 4), (1, 4), (1, 1), (1, 1), (2, 3)];

    let table = compute_standings(&teams, &matches, &goals);
    let order: Vec<i64> = table.iter().map(|r| r.team_id).collect();

    assert_eq!(order, vec![4, 3, 1, 2]);
    let positions: Vec<u32> = table.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn rows_only_exist_for_listed_teams() {
    // Team 9 was soft-deleted and is not passed in
    let table = compute_standings(&[team(1, "Persib")], &[game(1, 1, 9, MatchStatus::AwayWin)], &[(1, 9)]);

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].losses, 1);
    assert_eq!(table[0].goals_against, 1);
}
