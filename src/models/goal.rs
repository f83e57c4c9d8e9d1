use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::player::{PlayerTeam, Position};

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Goal {
    pub id: i64,
    pub match_id: i64,
    pub team_id: i64,
    pub scorer_player_id: i64,
    pub minute: String,
    pub created_at: DateTime<Utc>,
}

/// Goal joined with its team and scorer, in recording order
#[derive(Debug, FromRow, Clone)]
pub struct GoalDetail {
    pub id: i64,
    pub match_id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub scorer_player_id: i64,
    pub scorer_name: String,
    pub scorer_height_cm: i32,
    pub scorer_weight_kg: i32,
    pub scorer_position: Position,
    pub scorer_jersey_number: i32,
    pub minute: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoalScorer {
    pub id: i64,
    pub name: String,
    pub position: Position,
    pub jersey_number: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoalResponse {
    pub id: i64,
    pub minute: String,
    pub team: PlayerTeam,
    pub scorer: GoalScorer,
}

impl From<&GoalDetail> for GoalResponse {
    fn from(g: &GoalDetail) -> Self {
        Self {
            id: g.id,
            minute: g.minute.clone(),
            team: PlayerTeam {
                id: g.team_id,
                name: g.team_name.clone(),
            },
            scorer: GoalScorer {
                id: g.scorer_player_id,
                name: g.scorer_name.clone(),
                position: g.scorer_position,
                jersey_number: g.scorer_jersey_number,
            },
        }
    }
}

/// Input of AddGoal. Zero ids are treated as missing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateGoalRequest {
    #[serde(default)]
    pub match_id: i64,
    #[serde(default)]
    pub team_id: i64,
    #[serde(default)]
    pub scorer_player_id: i64,
    #[serde(default)]
    pub minute: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResultGoal {
    #[serde(default)]
    pub team_id: i64,
    #[serde(default)]
    pub scorer_player_id: i64,
    #[serde(default)]
    pub minute: String,
}

/// Body of the submit-result endpoint: goals to record before the result is computed
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SubmitResultRequest {
    #[serde(default)]
    pub goals: Vec<ResultGoal>,
}

impl ResultGoal {
    pub fn for_match(&self, match_id: i64) -> CreateGoalRequest {
        CreateGoalRequest {
            match_id,
            team_id: self.team_id,
            scorer_player_id: self.scorer_player_id,
            minute: self.minute.clone(),
        }
    }
}

/// Aggregated goals of one player across all matches
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct TopScorer {
    pub player_id: i64,
    pub player_name: String,
    pub team_id: i64,
    pub team_name: String,
    pub goals: i64,
}
