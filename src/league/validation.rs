use crate::error::AppError;
use crate::models::matches::{CreateMatchRequest, MatchStatus};

/// Rules for creating matches and moving them through their lifecycle
#[derive(Debug, Clone, Copy)]
pub struct MatchValidator;

impl MatchValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate match creation request
    pub fn validate_create_match_request(&self, request: &CreateMatchRequest) -> Result<(), AppError> {
        if request.home_team_id <= 0 {
            return Err(AppError::validation("home_team_id is required"));
        }
        if request.away_team_id <= 0 {
            return Err(AppError::validation("away_team_id is required"));
        }
        if request.home_team_id == request.away_team_id {
            return Err(AppError::validation("Home and away team must be different"));
        }
        Ok(())
    }

    /// Status changes allowed through the update operation.
    ///
    /// `SCHEDULED -> IN_PROGRESS | CANCELLED`, `IN_PROGRESS -> FINISHED | CANCELLED`,
    /// and keeping the current status. Result statuses are reserved for
    /// result processing.
    pub fn validate_status_transition(&self, from: MatchStatus, to: MatchStatus) -> Result<(), AppError> {
        if from == to {
            return Ok(());
        }
        if to.is_resolved() {
            return Err(AppError::validation(format!(
                "Status {} can only be set by processing the match result",
                to
            )));
        }

        let allowed = matches!(
            (from, to),
            (MatchStatus::Scheduled, MatchStatus::InProgress)
                | (MatchStatus::Scheduled, MatchStatus::Cancelled)
                | (MatchStatus::InProgress, MatchStatus::Finished)
                | (MatchStatus::InProgress, MatchStatus::Cancelled)
        );
        if allowed {
            Ok(())
        } else {
            Err(AppError::conflict(format!(
                "Cannot change match status from {} to {}",
                from, to
            )))
        }
    }

    /// Rescheduling only makes sense before kick-off
    pub fn validate_reschedule(&self, status: MatchStatus) -> Result<(), AppError> {
        if status != MatchStatus::Scheduled {
            return Err(AppError::conflict(format!(
                "Cannot reschedule a match with status {}",
                status
            )));
        }
        Ok(())
    }

    /// Result processing accepts live, finished and already resolved matches
    pub fn validate_result_processing(&self, status: MatchStatus) -> Result<(), AppError> {
        match status {
            MatchStatus::Scheduled | MatchStatus::Cancelled => Err(AppError::conflict(format!(
                "Cannot process the result of a match with status {}",
                status
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for MatchValidator {
    fn default() -> Self {
        Self::new()
    }
}
