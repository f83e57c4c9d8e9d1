use sqlx::PgPool;

use crate::db::helpers::{ensure_not_exists, fetch_page, require_record};
use crate::db::teams::{self, TEAM_LIST};
use crate::error::{AppError, AppResult};
use crate::models::common::PaginatedResponse;
use crate::models::team::{CreateTeamRequest, Team, UpdateTeamRequest};
use crate::utils::query::QueryParams;

const NAME_TAKEN: &str = "A team with this name already exists";

#[derive(Debug)]
pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Create team", skip(self))]
    pub async fn create(&self, request: &CreateTeamRequest) -> AppResult<Team> {
        request.validate().map_err(AppError::Validation)?;
        ensure_not_exists(teams::find_by_name(&self.pool, &request.name).await, NAME_TAKEN)?;

        let team = teams::insert(&self.pool, request)
            .await
            .map_err(|e| AppError::from_unique_violation(e, NAME_TAKEN))?;
        tracing::info!("Created team {} ({})", team.id, team.name);
        Ok(team)
    }

    #[tracing::instrument(name = "Update team", skip(self))]
    pub async fn update(&self, id: i64, request: &UpdateTeamRequest) -> AppResult<Team> {
        request.validate().map_err(AppError::Validation)?;

        if let Some(name) = &request.name {
            if let Some(existing) = teams::find_by_name(&self.pool, name).await? {
                if existing != id {
                    return Err(AppError::conflict(NAME_TAKEN));
                }
            }
        }

        let team = teams::update(&self.pool, id, request)
            .await
            .map_err(|e| AppError::from_unique_violation(e, NAME_TAKEN))?
            .ok_or_else(|| AppError::not_found("Team not found"))?;
        tracing::info!("Updated team {}", team.id);
        Ok(team)
    }

    #[tracing::instrument(name = "Delete team", skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !teams::soft_delete(&self.pool, id).await? {
            return Err(AppError::not_found("Team not found"));
        }
        tracing::info!("Soft-deleted team {}", id);
        Ok(())
    }

    pub async fn get(&self, id: i64) -> AppResult<Team> {
        require_record(teams::find_live(&self.pool, id).await, "Team not found")
    }

    pub async fn list(&self, params: &QueryParams) -> AppResult<PaginatedResponse<Team>> {
        fetch_page(&self.pool, &TEAM_LIST, params).await
    }
}
