use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::auth::jwt::AccessClaims;
use crate::error::AppError;
use crate::models::user::UserRole;

/// Read-only tier: every role may read
pub const ANY_ROLE: &[UserRole] = &[UserRole::Admin, UserRole::Staff, UserRole::Viewer];
/// Roles that may mutate players, matches and goals
pub const STAFF_OR_ADMIN: &[UserRole] = &[UserRole::Admin, UserRole::Staff];
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Caller identity established by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn require(&self, allowed: &[UserRole]) -> Result<(), AppError> {
        require_role(self.role, allowed)
    }
}

pub fn require_role(role: UserRole, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Role {} is not allowed to perform this action",
            role
        )))
    }
}

/// Single authorization decision for a request whose token already passed
/// signature, expiry and type checks.
///
/// `stored_version` is the user's current token version, `None` when the
/// user no longer exists.
pub fn authorize(
    claims: &AccessClaims,
    stored_version: Option<i32>,
    allowed: &[UserRole],
) -> Result<AuthenticatedUser, AppError> {
    match stored_version {
        None => return Err(AppError::unauthorized("User no longer exists")),
        Some(version) if version != claims.ver => {
            return Err(AppError::unauthorized("Token has been revoked"));
        }
        Some(_) => {}
    }
    require_role(claims.role, allowed)?;
    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| AppError::unauthorized("Authentication required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::ACCESS_TOKEN_TYPE;

    fn claims(role: UserRole, ver: i32) -> AccessClaims {
        AccessClaims {
            sub: 7,
            role,
            ver,
            typ: ACCESS_TOKEN_TYPE.to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn current_version_and_allowed_role_pass() {
        let user = authorize(&claims(UserRole::Staff, 2), Some(2), STAFF_OR_ADMIN).unwrap();
        assert_eq!(user, AuthenticatedUser { user_id: 7, role: UserRole::Staff });
    }

    #[test]
    fn stale_version_is_unauthorized_even_for_admins() {
        let err = authorize(&claims(UserRole::Admin, 1), Some(2), ANY_ROLE).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        let err = authorize(&claims(UserRole::Admin, 1), None, ANY_ROLE).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn role_outside_the_allowed_set_is_forbidden() {
        let err = authorize(&claims(UserRole::Viewer, 0), Some(0), STAFF_OR_ADMIN).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(require_role(UserRole::Staff, ADMIN_ONLY).is_err());
        assert!(require_role(UserRole::Admin, ADMIN_ONLY).is_ok());
    }
}
