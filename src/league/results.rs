use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool};

use crate::db::helpers::require_record;
use crate::db::{goals, matches, teams};
use crate::error::{AppError, AppResult};
use crate::league::goals::{record_goal, validate_goal_ids};
use crate::league::validation::MatchValidator;
use crate::models::goal::{GoalDetail, SubmitResultRequest};
use crate::models::league::{
    MatchReport, MatchResult, MatchTopScorer, Outcome, ReportGoal, ReportMatch, ReportPlayer, Score,
};
use crate::models::matches::Match;
use crate::models::team::Team;

/// Count goals per side. A goal belongs to the home side when its team is
/// the home team and to the away side otherwise.
pub fn tally<I>(game: &Match, goal_team_ids: I) -> Score
where
    I: IntoIterator<Item = i64>,
{
    goal_team_ids
        .into_iter()
        .fold(Score::default(), |mut score, team_id| {
            if team_id == game.home_team_id {
                score.home += 1;
            } else {
                score.away += 1;
            }
            score
        })
}

/// Player with the most goals in the match; ties go to the lowest player id
pub fn top_scorer(goals: &[GoalDetail]) -> Option<MatchTopScorer> {
    let mut per_player: BTreeMap<i64, (u32, &GoalDetail)> = BTreeMap::new();
    for goal in goals {
        per_player
            .entry(goal.scorer_player_id)
            .or_insert((0, goal))
            .0 += 1;
    }

    let mut best: Option<(u32, &GoalDetail)> = None;
    for (count, goal) in per_player.into_values() {
        if best.map_or(true, |(top, _)| count > top) {
            best = Some((count, goal));
        }
    }

    best.map(|(count, g)| MatchTopScorer {
        id: g.scorer_player_id,
        name: g.scorer_name.clone(),
        height: g.scorer_height_cm,
        weight: g.scorer_weight_kg,
        position: g.scorer_position,
        jersey_number: g.scorer_jersey_number,
        goals: count,
    })
}

pub fn build_report(
    game: &Match,
    home_team: &Team,
    away_team: &Team,
    goals: &[GoalDetail],
    home_wins: i64,
    away_wins: i64,
) -> MatchReport {
    let score = tally(game, goals.iter().map(|g| g.team_id));
    let outcome = Outcome::from_score(score);

    MatchReport {
        match_summary: ReportMatch {
            id: game.id,
            match_date: game.match_date_time,
            home_team: home_team.into(),
            away_team: away_team.into(),
        },
        score,
        outcome,
        status: outcome.description().to_string(),
        goals: goals
            .iter()
            .map(|g| ReportGoal {
                player: ReportPlayer {
                    id: g.scorer_player_id,
                    name: g.scorer_name.clone(),
                    position: g.scorer_position,
                    jersey_number: g.scorer_jersey_number,
                },
                minute: g.minute.clone(),
            })
            .collect(),
        top_scorer: top_scorer(goals),
        home_wins,
        away_wins,
    }
}

/// Tally the goals of a locked match and persist its resolved status
async fn resolve_locked(conn: &mut PgConnection, game: &Match) -> AppResult<MatchResult> {
    let goal_teams = goals::team_goals_for_matches(&mut *conn, &[game.id]).await?;
    let score = tally(game, goal_teams.into_iter().map(|(_, team_id)| team_id));
    let status = Outcome::from_score(score).status();
    matches::set_status(&mut *conn, game.id, status).await?;

    Ok(MatchResult {
        match_id: game.id,
        status,
        score,
    })
}

/// Match result processing and reporting
#[derive(Debug)]
pub struct MatchResultService {
    pool: PgPool,
}

impl MatchResultService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Compute and store the result under the match row lock
    #[tracing::instrument(name = "Process match result", skip(self))]
    pub async fn process_result(&self, match_id: i64) -> AppResult<MatchResult> {
        let mut tx = self.pool.begin().await?;
        let game = require_record(matches::find_for_update(&mut *tx, match_id).await, "Match not found")?;
        MatchValidator::new().validate_result_processing(game.status)?;

        let result = resolve_locked(&mut tx, &game).await?;
        tx.commit().await?;

        tracing::info!(
            "Match {} resolved as {} ({}-{})",
            match_id, result.status, result.score.home, result.score.away
        );
        Ok(result)
    }

    /// Record all submitted goals and process the result as one unit of work.
    /// Any rejected goal rolls the whole submission back.
    #[tracing::instrument(name = "Submit match result", skip(self, request), fields(goals = request.goals.len()))]
    pub async fn submit_result(&self, match_id: i64, request: &SubmitResultRequest) -> AppResult<MatchResult> {
        let mut tx = self.pool.begin().await?;
        let game = require_record(matches::find_for_update(&mut *tx, match_id).await, "Match not found")?;
        MatchValidator::new().validate_result_processing(game.status)?;

        for (index, goal) in request.goals.iter().enumerate() {
            let goal = goal.for_match(match_id);
            validate_goal_ids(&goal).map_err(|e| prefix_goal_error(index, e))?;
            record_goal(&mut tx, &game, &goal)
                .await
                .map_err(|e| prefix_goal_error(index, e))?;
        }

        let result = resolve_locked(&mut tx, &game).await?;
        tx.commit().await?;

        tracing::info!(
            "Match {} result submitted with {} goals: {}",
            match_id,
            request.goals.len(),
            result.status
        );
        Ok(result)
    }

    #[tracing::instrument(name = "Match report", skip(self))]
    pub async fn report(&self, match_id: i64) -> AppResult<MatchReport> {
        let game = require_record(matches::find_by_id(&self.pool, match_id).await, "Match not found")?;
        let home_team = require_record(teams::find_by_id(&self.pool, game.home_team_id).await, "Home team not found")?;
        let away_team = require_record(teams::find_by_id(&self.pool, game.away_team_id).await, "Away team not found")?;
        let goals = goals::details_for_match(&self.pool, match_id).await?;
        let home_wins = matches::count_home_wins(&self.pool, game.home_team_id).await?;
        let away_wins = matches::count_away_wins(&self.pool, game.away_team_id).await?;

        Ok(build_report(&game, &home_team, &away_team, &goals, home_wins, away_wins))
    }
}

/// Point at the offending entry of a submitted goal list
fn prefix_goal_error(index: usize, err: AppError) -> AppError {
    match err {
        AppError::Validation(msg) => AppError::Validation(format!("goals[{}]: {}", index, msg)),
        AppError::NotFound(msg) => AppError::NotFound(format!("goals[{}]: {}", index, msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::MatchStatus;
    use crate::models::player::Position;
    use chrono::Utc;

    fn game() -> Match {
        Match {
            id: 1,
            match_date_time: Utc::now(),
            home_team_id: 1,
            away_team_id: 2,
            status: MatchStatus::InProgress,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn goal(id: i64, team_id: i64, scorer: i64, minute: &str) -> GoalDetail {
        GoalDetail {
            id,
            match_id: 1,
            team_id,
            team_name: format!("Team {}", team_id),
            scorer_player_id: scorer,
            scorer_name: format!("Player {}", scorer),
            scorer_height_cm: 180,
            scorer_weight_kg: 75,
            scorer_position: Position::Attacker,
            scorer_jersey_number: scorer as i32,
            minute: minute.into(),
        }
    }

    #[test]
    fn two_home_goals_against_one_is_a_home_win() {
        let score = tally(&game(), [1, 1, 2]);
        assert_eq!(score, Score { home: 2, away: 1 });
        assert_eq!(Outcome::from_score(score).status(), MatchStatus::HomeWin);
    }

    #[test]
    fn no_goals_is_a_draw() {
        let score = tally(&game(), Vec::<i64>::new());
        assert_eq!(Outcome::from_score(score).status(), MatchStatus::Draw);
    }

    #[test]
    fn top_scorer_tie_goes_to_lowest_player_id() {
        let goals = vec![goal(1, 2, 30, "5"), goal(2, 1, 20, "7"), goal(3, 2, 30, "8"), goal(4, 1, 20, "9")];
        let top = top_scorer(&goals).unwrap();
        assert_eq!(top.id, 20);
        assert_eq!(top.goals, 2);
        assert!(top_scorer(&[]).is_none());
    }

    #[test]
    fn report_keeps_recording_order() {
        let goals = vec![goal(1, 1, 9, "10"), goal(2, 1, 9, "50"), goal(3, 2, 4, "80")];
        let team = |id: i64| Team {
            id,
            name: format!("Team {}", id),
            logo_url: String::new(),
            year_founded: None,
            address: String::new(),
            city: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let report = build_report(&game(), &team(1), &team(2), &goals, 3, 1);
        assert_eq!(report.score, Score { home: 2, away: 1 });
        assert_eq!(report.status, "Home team wins");
        let minutes: Vec<_> = report.goals.iter().map(|g| g.minute.as_str()).collect();
        assert_eq!(minutes, ["10", "50", "80"]);
        assert_eq!(report.top_scorer.unwrap().id, 9);
        assert_eq!((report.home_wins, report.away_wins), (3, 1));
    }
}
