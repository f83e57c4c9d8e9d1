use sqlx::{PgConnection, PgPool};

use crate::db::helpers::{fetch_page, require_record};
use crate::db::players::{self, NewPlayer, PlayerChanges, PLAYER_LIST};
use crate::db::{teams, transfers};
use crate::error::{AppError, AppResult};
use crate::models::common::PaginatedResponse;
use crate::models::player::{
    CreatePlayerRequest, PlayerResponse, PlayerTransfer, PlayerWithTeam, TransferRequest,
    TransferResponse, UpdatePlayerRequest,
};
use crate::models::team::Team;
use crate::utils::query::{QueryParams, RawFilter};

const JERSEY_TAKEN: &str = "Jersey number is already taken in this team";

/// Destination team for a new or transferred player: must exist and be live
fn check_destination(team: Option<Team>) -> AppResult<Team> {
    let team = team.ok_or_else(|| AppError::not_found("Team not found"))?;
    if team.is_deleted() {
        return Err(AppError::validation(format!(
            "Team {} has been deleted and cannot receive players",
            team.id
        )));
    }
    Ok(team)
}

async fn ensure_jersey_free(
    conn: &mut PgConnection,
    team_id: i64,
    jersey_number: i32,
    exclude_player_id: Option<i64>,
) -> AppResult<()> {
    if players::jersey_holder(conn, team_id, jersey_number, exclude_player_id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(JERSEY_TAKEN));
    }
    Ok(())
}

#[derive(Debug)]
pub struct PlayerService {
    pool: PgPool,
}

impl PlayerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Create player", skip(self))]
    pub async fn create(&self, request: &CreatePlayerRequest) -> AppResult<PlayerResponse> {
        let position = request.validate().map_err(AppError::Validation)?;

        let mut tx = self.pool.begin().await?;
        let team = check_destination(teams::find_for_share(&mut *tx, request.team_id).await?)?;
        ensure_jersey_free(&mut tx, team.id, request.jersey_number, None).await?;

        let player = players::insert(
            &mut *tx,
            &NewPlayer {
                team_id: team.id,
                name: &request.name,
                height_cm: request.height,
                weight_kg: request.weight,
                position,
                jersey_number: request.jersey_number,
            },
        )
        .await
        .map_err(|e| AppError::from_unique_violation(e, JERSEY_TAKEN))?;
        tx.commit().await?;

        tracing::info!("Created player {} in team {}", player.id, team.id);
        self.get(player.id).await
    }

    #[tracing::instrument(name = "Update player", skip(self))]
    pub async fn update(&self, id: i64, request: &UpdatePlayerRequest) -> AppResult<PlayerResponse> {
        let position = request.validate().map_err(AppError::Validation)?;

        let mut tx = self.pool.begin().await?;
        let player = require_record(players::find_live_for_update(&mut *tx, id).await, "Player not found")?;
        if let Some(jersey_number) = request.jersey_number {
            ensure_jersey_free(&mut tx, player.team_id, jersey_number, Some(player.id)).await?;
        }

        players::update(
            &mut *tx,
            id,
            &PlayerChanges {
                name: request.name.as_deref(),
                height_cm: request.height,
                weight_kg: request.weight,
                position,
                jersey_number: request.jersey_number,
            },
        )
        .await
        .map_err(|e| AppError::from_unique_violation(e, JERSEY_TAKEN))?
        .ok_or_else(|| AppError::not_found("Player not found"))?;
        tx.commit().await?;

        self.get(id).await
    }

    #[tracing::instrument(name = "Delete player", skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !players::soft_delete(&self.pool, id).await? {
            return Err(AppError::not_found("Player not found"));
        }
        tracing::info!("Soft-deleted player {}", id);
        Ok(())
    }

    pub async fn get(&self, id: i64) -> AppResult<PlayerResponse> {
        let player = require_record(players::find_with_team(&self.pool, id).await, "Player not found")?;
        Ok(PlayerResponse::from(player))
    }

    pub async fn list(&self, params: &QueryParams) -> AppResult<PaginatedResponse<PlayerResponse>> {
        let page = fetch_page::<PlayerWithTeam>(&self.pool, &PLAYER_LIST, params).await?;
        Ok(page.map(PlayerResponse::from))
    }

    /// Current players of a team, with the usual list parameters
    pub async fn list_by_team(
        &self,
        team_id: i64,
        params: &QueryParams,
    ) -> AppResult<PaginatedResponse<PlayerResponse>> {
        require_record(teams::find_live(&self.pool, team_id).await, "Team not found")?;

        let mut params = params.clone();
        params.filters.push(RawFilter {
            field: "team_id".to_string(),
            operator: "eq".to_string(),
            value: team_id.to_string(),
        });
        self.list(&params).await
    }

    /// Move a player to another team under a new jersey number.
    ///
    /// The history record and the player update commit together. The partial
    /// unique index on `(team_id, jersey_number)` is the final guard against
    /// two concurrent transfers claiming the same number.
    #[tracing::instrument(name = "Transfer player", skip(self))]
    pub async fn transfer(&self, id: i64, request: &TransferRequest) -> AppResult<TransferResponse> {
        request.validate().map_err(AppError::Validation)?;

        let mut tx = self.pool.begin().await?;
        let player = require_record(players::find_live_for_update(&mut *tx, id).await, "Player not found")?;
        let team = check_destination(teams::find_for_share(&mut *tx, request.new_team_id).await?)?;
        if team.id == player.team_id {
            return Err(AppError::validation(format!(
                "Player {} already plays for team {}",
                player.id, team.id
            )));
        }
        ensure_jersey_free(&mut tx, team.id, request.jersey_number, None).await?;

        let transfer = transfers::insert(&mut *tx, player.id, player.team_id, team.id, request.jersey_number).await?;
        players::move_to_team(&mut *tx, player.id, team.id, request.jersey_number)
            .await
            .map_err(|e| AppError::from_unique_violation(e, JERSEY_TAKEN))?;
        tx.commit().await?;

        tracing::info!(
            "Transferred player {} from team {} to team {} with jersey {}",
            player.id, transfer.old_team_id, transfer.new_team_id, transfer.jersey_number
        );
        Ok(TransferResponse {
            player: self.get(player.id).await?,
            transfer,
        })
    }

    pub async fn transfers(&self, id: i64) -> AppResult<Vec<PlayerTransfer>> {
        require_record(players::find_live(&self.pool, id).await, "Player not found")?;
        Ok(transfers::for_player(&self.pool, id).await?)
    }
}
