use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::goal::GoalResponse;
use crate::models::player::PlayerTeam;
use crate::models::team::TeamSummary;

/// Lifecycle state of a match. The last three are only ever written by
/// result processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
    Cancelled,
    HomeWin,
    AwayWin,
    Draw,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::InProgress => "IN_PROGRESS",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Cancelled => "CANCELLED",
            MatchStatus::HomeWin => "HOME_WIN",
            MatchStatus::AwayWin => "AWAY_WIN",
            MatchStatus::Draw => "DRAW",
        }
    }

    /// HOME_WIN, AWAY_WIN or DRAW
    pub fn is_resolved(&self) -> bool {
        matches!(self, MatchStatus::HomeWin | MatchStatus::AwayWin | MatchStatus::Draw)
    }

    /// Whether the match contributes to the league table
    pub fn is_completed(&self) -> bool {
        *self == MatchStatus::Finished || self.is_resolved()
    }

    pub fn accepts_goals(&self) -> bool {
        *self == MatchStatus::InProgress
    }

    /// Statuses counted by the standing engine, as stored
    pub const COMPLETED: [MatchStatus; 4] = [
        MatchStatus::Finished,
        MatchStatus::HomeWin,
        MatchStatus::AwayWin,
        MatchStatus::Draw,
    ];
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => Ok(MatchStatus::Scheduled),
            "IN_PROGRESS" => Ok(MatchStatus::InProgress),
            "FINISHED" => Ok(MatchStatus::Finished),
            "CANCELLED" => Ok(MatchStatus::Cancelled),
            "HOME_WIN" => Ok(MatchStatus::HomeWin),
            "AWAY_WIN" => Ok(MatchStatus::AwayWin),
            "DRAW" => Ok(MatchStatus::Draw),
            other => Err(format!("Unknown match status '{}'", other)),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct Match {
    pub id: i64,
    pub match_date_time: DateTime<Utc>,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn involves(&self, team_id: i64) -> bool {
        team_id == self.home_team_id || team_id == self.away_team_id
    }
}

/// Row shape of the match list query: team names joined and scores derived
#[derive(Debug, FromRow, Clone)]
pub struct MatchListRow {
    pub id: i64,
    pub match_date_time: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_team_id: i64,
    pub home_team_name: String,
    pub away_team_id: i64,
    pub away_team_name: String,
    pub home_score: i64,
    pub away_score: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchListItem {
    pub id: i64,
    pub match_date: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_team: PlayerTeam,
    pub away_team: PlayerTeam,
    pub home_score: i64,
    pub away_score: i64,
}

impl From<MatchListRow> for MatchListItem {
    fn from(row: MatchListRow) -> Self {
        Self {
            id: row.id,
            match_date: row.match_date_time,
            status: row.status,
            home_team: PlayerTeam {
                id: row.home_team_id,
                name: row.home_team_name,
            },
            away_team: PlayerTeam {
                id: row.away_team_id,
                name: row.away_team_name,
            },
            home_score: row.home_score,
            away_score: row.away_score,
        }
    }
}

/// Full match payload with goals and the derived score
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchResponse {
    pub id: i64,
    pub match_date: DateTime<Utc>,
    pub status: MatchStatus,
    pub home_team: TeamSummary,
    pub away_team: TeamSummary,
    pub goals: Vec<GoalResponse>,
    pub home_score: i64,
    pub away_score: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMatchRequest {
    pub match_date_time: DateTime<Utc>,
    pub home_team_id: i64,
    pub away_team_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateMatchRequest {
    pub status: Option<String>,
    pub match_date_time: Option<DateTime<Utc>>,
}
