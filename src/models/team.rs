// src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
    pub year_founded: Option<i32>,
    pub address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Team {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Team as embedded in match, goal and player payloads
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
    pub year_founded: Option<i32>,
    pub address: String,
    pub city: String,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            logo_url: team.logo_url.clone(),
            year_founded: team.year_founded,
            address: team.address.clone(),
            city: team.city.clone(),
        }
    }
}

impl From<Team> for TeamSummary {
    fn from(team: Team) -> Self {
        TeamSummary::from(&team)
    }
}

/// Request to create a team
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub year_founded: Option<i32>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Request to update team information; absent fields are left untouched
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub year_founded: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
}

fn validate_team_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Team name is required".to_string());
    }
    if name.len() > 255 {
        return Err("Team name cannot exceed 255 characters".to_string());
    }
    Ok(())
}

fn validate_year_founded(year: Option<i32>) -> Result<(), String> {
    match year {
        Some(year) if !(1800..=2100).contains(&year) => {
            Err(format!("Founding year {} is out of range", year))
        }
        _ => Ok(()),
    }
}

impl CreateTeamRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_team_name(&self.name)?;
        validate_year_founded(self.year_founded)
    }
}

impl UpdateTeamRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_team_name(name)?;
        }
        validate_year_founded(self.year_founded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_name_is_required() {
        let request = CreateTeamRequest {
            name: "   ".into(),
            logo_url: None,
            year_founded: None,
            address: None,
            city: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_without_name_is_valid() {
        let request = UpdateTeamRequest {
            city: Some("Bandung".into()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
        let bad = UpdateTeamRequest {
            year_founded: Some(1200),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
