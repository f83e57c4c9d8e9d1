use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Attacker,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Attacker => "ATTACKER",
            Position::Midfielder => "MIDFIELDER",
            Position::Defender => "DEFENDER",
            Position::Goalkeeper => "GOALKEEPER",
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ATTACKER" => Ok(Position::Attacker),
            "MIDFIELDER" => Ok(Position::Midfielder),
            "DEFENDER" => Ok(Position::Defender),
            "GOALKEEPER" => Ok(Position::Goalkeeper),
            other => Err(format!(
                "Invalid position '{}' (expected ATTACKER, MIDFIELDER, DEFENDER or GOALKEEPER)",
                other
            )),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct Player {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub position: Position,
    pub jersey_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Player joined with the name of the team it currently plays for
#[derive(Debug, FromRow, Clone)]
pub struct PlayerWithTeam {
    pub id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub name: String,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub position: Position,
    pub jersey_number: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerTeam {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerResponse {
    pub id: i64,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub position: Position,
    pub jersey_number: i32,
    pub team: PlayerTeam,
}

impl From<PlayerWithTeam> for PlayerResponse {
    fn from(p: PlayerWithTeam) -> Self {
        Self {
            id: p.id,
            name: p.name,
            height: p.height_cm,
            weight: p.weight_kg,
            position: p.position,
            jersey_number: p.jersey_number,
            team: PlayerTeam {
                id: p.team_id,
                name: p.team_name,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePlayerRequest {
    pub team_id: i64,
    pub name: String,
    #[serde(default)]
    pub height: i32,
    #[serde(default)]
    pub weight: i32,
    pub position: String,
    pub jersey_number: i32,
}

/// Request to update a player; absent fields are left untouched.
/// Team changes go through the transfer workflow instead.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferRequest {
    pub new_team_id: i64,
    pub jersey_number: i32,
}

/// Immutable history record written on every transfer
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct PlayerTransfer {
    pub id: i64,
    pub player_id: i64,
    pub old_team_id: i64,
    pub new_team_id: i64,
    pub jersey_number: i32,
    pub created_at: DateTime<Utc>,
}

/// Result of a transfer: the player as it is now plus the history record
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferResponse {
    pub player: PlayerResponse,
    pub transfer: PlayerTransfer,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.new_team_id <= 0 {
            return Err("new_team_id is required".to_string());
        }
        validate_jersey_number(self.jersey_number)
    }
}

pub fn validate_jersey_number(jersey_number: i32) -> Result<(), String> {
    if jersey_number <= 0 {
        return Err("Jersey number must be a positive integer".to_string());
    }
    Ok(())
}

fn validate_body_measure(value: i32, what: &str) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} cannot be negative", what));
    }
    Ok(())
}

impl CreatePlayerRequest {
    /// Validate the request and return the parsed position
    pub fn validate(&self) -> Result<Position, String> {
        if self.name.trim().is_empty() {
            return Err("Player name is required".to_string());
        }
        if self.team_id <= 0 {
            return Err("team_id is required".to_string());
        }
        validate_body_measure(self.height, "Height")?;
        validate_body_measure(self.weight, "Weight")?;
        validate_jersey_number(self.jersey_number)?;
        self.position.parse()
    }
}

impl UpdatePlayerRequest {
    pub fn validate(&self) -> Result<Option<Position>, String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("Player name cannot be empty".to_string());
            }
        }
        if let Some(height) = self.height {
            validate_body_measure(height, "Height")?;
        }
        if let Some(weight) = self.weight {
            validate_body_measure(weight, "Weight")?;
        }
        if let Some(jersey_number) = self.jersey_number {
            validate_jersey_number(jersey_number)?;
        }
        self.position.as_deref().map(str::parse).transpose()
    }
}
