use sqlx::{PgConnection, PgPool};

use crate::db::helpers::require_record;
use crate::db::{goals, matches, players};
use crate::error::{AppError, AppResult};
use crate::models::goal::{CreateGoalRequest, Goal, GoalResponse, TopScorer};
use crate::models::matches::Match;
use crate::models::player::Player;

pub const DEFAULT_TOP_SCORERS: i64 = 10;
pub const MAX_TOP_SCORERS: i64 = 100;

/// Regulation minute `0`..=`90` without leading zeros, or stoppage time
/// written as `45+N` / `90+N`.
pub fn is_valid_minute(minute: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if let Some((base, extra)) = minute.split_once('+') {
        return (base == "45" || base == "90") && all_digits(extra);
    }
    if !all_digits(minute) || (minute.len() > 1 && minute.starts_with('0')) {
        return false;
    }
    minute.parse::<u32>().map(|m| m <= 90).unwrap_or(false)
}

pub fn validate_goal_ids(request: &CreateGoalRequest) -> Result<(), AppError> {
    if request.match_id <= 0 {
        return Err(AppError::validation("match_id is required"));
    }
    if request.team_id <= 0 {
        return Err(AppError::validation("team_id is required"));
    }
    if request.scorer_player_id <= 0 {
        return Err(AppError::validation("scorer_player_id is required"));
    }
    Ok(())
}

/// Checks that only need the match: team membership, minute format, status
pub fn check_goal_against_match(request: &CreateGoalRequest, game: &Match) -> Result<(), AppError> {
    if !game.involves(request.team_id) {
        return Err(AppError::validation(format!(
            "Team {} does not play in match {}",
            request.team_id, game.id
        )));
    }
    if !is_valid_minute(&request.minute) {
        return Err(AppError::validation(format!(
            "Invalid minute '{}': expected 0-90, 45+N or 90+N",
            request.minute
        )));
    }
    if !game.status.accepts_goals() {
        return Err(AppError::validation(format!(
            "Goals cannot be added to a match with status {}",
            game.status
        )));
    }
    Ok(())
}

pub fn check_scorer(request: &CreateGoalRequest, scorer: &Player) -> Result<(), AppError> {
    if scorer.team_id != request.team_id {
        return Err(AppError::validation(format!(
            "Player {} does not play for team {}",
            scorer.id, request.team_id
        )));
    }
    Ok(())
}

/// Validate and insert one goal for a match the caller has already locked
pub async fn record_goal(
    conn: &mut PgConnection,
    game: &Match,
    request: &CreateGoalRequest,
) -> AppResult<Goal> {
    check_goal_against_match(request, game)?;

    let scorer = require_record(
        players::find_live(&mut *conn, request.scorer_player_id).await,
        "Scorer not found",
    )?;
    check_scorer(request, &scorer)?;

    let goal = goals::insert(
        &mut *conn,
        game.id,
        request.team_id,
        request.scorer_player_id,
        &request.minute,
    )
    .await?;
    Ok(goal)
}

/// Goal recording and goal queries
#[derive(Debug)]
pub struct GoalService {
    pool: PgPool,
}

impl GoalService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Add goal", skip(self))]
    pub async fn add_goal(&self, request: &CreateGoalRequest) -> AppResult<Goal> {
        validate_goal_ids(request)?;

        let mut tx = self.pool.begin().await?;
        let game = require_record(
            matches::find_for_share(&mut *tx, request.match_id).await,
            "Match not found",
        )?;
        let goal = record_goal(&mut tx, &game, request).await?;
        tx.commit().await?;

        tracing::info!("Recorded goal {} for match {} at minute {}", goal.id, goal.match_id, goal.minute);
        Ok(goal)
    }

    #[tracing::instrument(name = "Goals for match", skip(self))]
    pub async fn goals_for_match(&self, match_id: i64) -> AppResult<Vec<GoalResponse>> {
        require_record(matches::find_by_id(&self.pool, match_id).await, "Match not found")?;
        let details = goals::details_for_match(&self.pool, match_id).await?;
        Ok(details.iter().map(GoalResponse::from).collect())
    }

    #[tracing::instrument(name = "Top scorers", skip(self))]
    pub async fn top_scorers(&self, limit: Option<i64>) -> AppResult<Vec<TopScorer>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_SCORERS).clamp(1, MAX_TOP_SCORERS);
        Ok(goals::top_scorers(&self.pool, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::MatchStatus;
    use crate::models::player::Position;
    use chrono::Utc;

    fn game(status: MatchStatus) -> Match {
        Match {
            id: 5,
            match_date_time: Utc::now(),
            home_team_id: 1,
            away_team_id: 2,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(team_id: i64, minute: &str) -> CreateGoalRequest {
        CreateGoalRequest {
            match_id: 5,
            team_id,
            scorer_player_id: 10,
            minute: minute.into(),
        }
    }

    #[test]
    fn leading_zeros_and_empty_minutes_are_rejected() {
        assert!(!is_valid_minute("05"));
        assert!(!is_valid_minute(""));
        assert!(!is_valid_minute("+3"));
        assert!(!is_valid_minute("46+1"));
        assert!(is_valid_minute("45+10"));
    }

    #[test]
    fn team_check_runs_before_minute_and_status() {
        let err = check_goal_against_match(&request(3, "abc"), &game(MatchStatus::Scheduled)).unwrap_err();
        assert!(err.to_string().contains("does not play"));
        let err = check_goal_against_match(&request(1, "abc"), &game(MatchStatus::Scheduled)).unwrap_err();
        assert!(err.to_string().contains("Invalid minute"));
        let err = check_goal_against_match(&request(1, "12"), &game(MatchStatus::Scheduled)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn live_match_accepts_goals_for_either_side() {
        assert!(check_goal_against_match(&request(1, "12"), &game(MatchStatus::InProgress)).is_ok());
        assert!(check_goal_against_match(&request(2, "90+4"), &game(MatchStatus::InProgress)).is_ok());
    }

    #[test]
    fn missing_ids_are_validation_errors() {
        let mut req = request(1, "12");
        req.scorer_player_id = 0;
        assert!(matches!(validate_goal_ids(&req), Err(AppError::Validation(_))));
    }

    #[test]
    fn scorer_must_play_for_the_scoring_team() {
        let scorer = Player {
            id: 10,
            team_id: 2,
            name: "Ciro".into(),
            height_cm: 180,
            weight_kg: 75,
            position: Position::Attacker,
            jersey_number: 9,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        assert!(check_scorer(&request(2, "3"), &scorer).is_ok());
        assert!(matches!(check_scorer(&request(1, "3"), &scorer), Err(AppError::Validation(_))));
    }
}
