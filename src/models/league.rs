// src/models/league.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::matches::MatchStatus;
use crate::models::player::Position;
use crate::models::team::TeamSummary;

/// One row of the league table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Standing {
    pub position: u32,
    pub team_id: i64,
    pub team_name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl Standing {
    pub fn new(team_id: i64, team_name: impl Into<String>) -> Self {
        Self {
            position: 0,
            team_id,
            team_name: team_name.into(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Result of a match from the home side's perspective
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Outcome {
    pub fn from_score(score: Score) -> Self {
        if score.home > score.away {
            Outcome::HomeWin
        } else if score.away > score.home {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        }
    }

    pub fn status(&self) -> MatchStatus {
        match self {
            Outcome::HomeWin => MatchStatus::HomeWin,
            Outcome::AwayWin => MatchStatus::AwayWin,
            Outcome::Draw => MatchStatus::Draw,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Outcome::HomeWin => "Home team wins",
            Outcome::AwayWin => "Away team wins",
            Outcome::Draw => "Draw",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Returned by result processing
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchResult {
    pub match_id: i64,
    pub status: MatchStatus,
    pub score: Score,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportMatch {
    pub id: i64,
    pub match_date: DateTime<Utc>,
    pub home_team: TeamSummary,
    pub away_team: TeamSummary,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReportPlayer {
    pub id: i64,
    pub name: String,
    pub position: Position,
    pub jersey_number: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReportGoal {
    pub player: ReportPlayer,
    pub minute: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MatchTopScorer {
    pub id: i64,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub position: Position,
    pub jersey_number: i32,
    pub goals: u32,
}

/// Per-match report
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchReport {
    #[serde(rename = "match")]
    pub match_summary: ReportMatch,
    pub score: Score,
    pub outcome: Outcome,
    pub status: String,
    pub goals: Vec<ReportGoal>,
    pub top_scorer: Option<MatchTopScorer>,
    pub home_wins: i64,
    pub away_wins: i64,
}
