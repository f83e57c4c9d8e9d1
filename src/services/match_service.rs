use sqlx::{PgConnection, PgPool};

use crate::db::helpers::{fetch_page, require_record};
use crate::db::matches::{self, MATCH_LIST};
use crate::db::{goals, teams};
use crate::error::{AppError, AppResult};
use crate::league::results::tally;
use crate::league::validation::MatchValidator;
use crate::models::common::PaginatedResponse;
use crate::models::goal::GoalResponse;
use crate::models::matches::{
    CreateMatchRequest, MatchListItem, MatchListRow, MatchResponse, MatchStatus, UpdateMatchRequest,
};
use crate::models::team::Team;
use crate::utils::query::QueryParams;

const SCHEDULE_CONFLICT: &str = "One of the teams already has a match at this time";

async fn live_team(conn: &mut PgConnection, id: i64, side: &str) -> AppResult<Team> {
    let team = require_record(
        teams::find_for_share(conn, id).await,
        &format!("{} team not found", side),
    )?;
    if team.is_deleted() {
        return Err(AppError::validation(format!("{} team {} has been deleted", side, id)));
    }
    Ok(team)
}

/// Match scheduling, status updates and match queries
#[derive(Debug)]
pub struct MatchService {
    pool: PgPool,
    validator: MatchValidator,
}

impl MatchService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            validator: MatchValidator::new(),
        }
    }

    #[tracing::instrument(name = "Create match", skip(self))]
    pub async fn create(&self, request: &CreateMatchRequest) -> AppResult<MatchResponse> {
        self.validator.validate_create_match_request(request)?;

        let mut tx = self.pool.begin().await?;
        let home = live_team(&mut tx, request.home_team_id, "Home").await?;
        let away = live_team(&mut tx, request.away_team_id, "Away").await?;

        if matches::has_schedule_conflict(&mut *tx, [home.id, away.id], request.match_date_time, None).await? {
            return Err(AppError::conflict(SCHEDULE_CONFLICT));
        }

        let game = matches::insert(&mut *tx, request.match_date_time, home.id, away.id).await?;
        tx.commit().await?;

        tracing::info!("Scheduled match {}: {} vs {} at {}", game.id, home.name, away.name, game.match_date_time);
        self.get(game.id).await
    }

    /// Change status and/or kick-off time under the match row lock
    #[tracing::instrument(name = "Update match", skip(self))]
    pub async fn update(&self, id: i64, request: &UpdateMatchRequest) -> AppResult<MatchResponse> {
        let requested_status = request
            .status
            .as_deref()
            .map(str::parse::<MatchStatus>)
            .transpose()
            .map_err(AppError::Validation)?;

        let mut tx = self.pool.begin().await?;
        let game = require_record(matches::find_for_update(&mut *tx, id).await, "Match not found")?;

        let status = requested_status.unwrap_or(game.status);
        self.validator.validate_status_transition(game.status, status)?;

        let match_date_time = match request.match_date_time {
            Some(new_time) if new_time != game.match_date_time => {
                self.validator.validate_reschedule(game.status)?;
                let team_ids = [game.home_team_id, game.away_team_id];
                if matches::has_schedule_conflict(&mut *tx, team_ids, new_time, Some(game.id)).await? {
                    return Err(AppError::conflict(SCHEDULE_CONFLICT));
                }
                new_time
            }
            _ => game.match_date_time,
        };

        let updated = matches::update(&mut *tx, id, status, match_date_time).await?;
        tx.commit().await?;

        tracing::info!("Match {} is now {} at {}", id, updated.status, updated.match_date_time);
        self.get(id).await
    }

    /// Match with both teams, its goals in recording order and the derived score
    pub async fn get(&self, id: i64) -> AppResult<MatchResponse> {
        let game = require_record(matches::find_by_id(&self.pool, id).await, "Match not found")?;
        let home = require_record(teams::find_by_id(&self.pool, game.home_team_id).await, "Home team not found")?;
        let away = require_record(teams::find_by_id(&self.pool, game.away_team_id).await, "Away team not found")?;
        let details = goals::details_for_match(&self.pool, id).await?;
        let score = tally(&game, details.iter().map(|g| g.team_id));

        Ok(MatchResponse {
            id: game.id,
            match_date: game.match_date_time,
            status: game.status,
            home_team: home.into(),
            away_team: away.into(),
            goals: details.iter().map(GoalResponse::from).collect(),
            home_score: i64::from(score.home),
            away_score: i64::from(score.away),
        })
    }

    pub async fn list(&self, params: &QueryParams) -> AppResult<PaginatedResponse<MatchListItem>> {
        let page = fetch_page::<MatchListRow>(&self.pool, &MATCH_LIST, params).await?;
        Ok(page.map(MatchListItem::from))
    }
}
