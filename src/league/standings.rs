use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::{goals, matches, teams};
use crate::error::AppResult;
use crate::league::results::tally;
use crate::models::league::{Outcome, Standing};
use crate::models::matches::Match;
use crate::models::team::Team;

/// Build the ranked league table.
///
/// `goals` holds `(match_id, team_id)` pairs for the given matches. Every
/// team gets a row, including teams without a completed match. Rows are
/// ordered by points, goal difference and goals scored (all descending),
/// then by team id.
pub fn compute_standings(teams: &[Team], matches: &[Match], goals: &[(i64, i64)]) -> Vec<Standing> {
    let mut table: Vec<Standing> = teams.iter().map(|t| Standing::new(t.id, t.name.clone())).collect();
    let index: HashMap<i64, usize> = table.iter().enumerate().map(|(i, s)| (s.team_id, i)).collect();

    let mut goals_by_match: HashMap<i64, Vec<i64>> = HashMap::new();
    for (match_id, team_id) in goals {
        goals_by_match.entry(*match_id).or_default().push(*team_id);
    }

    for game in matches.iter().filter(|m| m.status.is_completed()) {
        let team_goals = goals_by_match.get(&game.id).cloned().unwrap_or_default();
        let score = tally(game, team_goals);
        let outcome = Outcome::from_score(score);

        if let Some(&i) = index.get(&game.home_team_id) {
            record(&mut table[i], score.home, score.away, outcome, Outcome::HomeWin);
        }
        if let Some(&i) = index.get(&game.away_team_id) {
            record(&mut table[i], score.away, score.home, outcome, Outcome::AwayWin);
        }
    }

    for row in table.iter_mut() {
        row.goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
        row.points = row.wins * 3 + row.draws;
    }

    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a.team_id.cmp(&b.team_id))
    });
    for (i, row) in table.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }

    table
}

fn record(row: &mut Standing, scored: u32, conceded: u32, outcome: Outcome, win_for_this_side: Outcome) {
    row.played += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    match outcome {
        Outcome::Draw => row.draws += 1,
        o if o == win_for_this_side => row.wins += 1,
        _ => row.losses += 1,
    }
}

/// Service responsible for the league table
#[derive(Debug)]
pub struct StandingsService {
    pool: PgPool,
}

impl StandingsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "League standing", skip(self))]
    pub async fn league_standing(&self) -> AppResult<Vec<Standing>> {
        let teams = teams::all_live(&self.pool).await?;
        let completed = matches::completed(&self.pool).await?;
        let match_ids: Vec<i64> = completed.iter().map(|m| m.id).collect();
        let goals = goals::team_goals_for_matches(&self.pool, &match_ids).await?;

        let table = compute_standings(&teams, &completed, &goals);
        tracing::info!(
            "Computed standings for {} teams from {} completed matches",
            table.len(),
            completed.len()
        );
        Ok(table)
    }
}
