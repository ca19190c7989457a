//! Authorization gate: composable per-request capability checks.
//!
//! Stage 1 ([`Claims`] as an extractor) authenticates the bearer token;
//! stage 2 ([`AdminUser`]) runs stage 1 and then requires the stored role
//! to be admin. Handlers opt in by taking the extractor as an argument, so
//! each stage is testable on its own.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use super::service::Claims;
use crate::gateway::error::ApiError;
use crate::gateway::state::AppState;
use crate::store::{Role, User};

/// Pulls the bearer token out of the Authorization header. A missing or
/// ill-formed header fails without attempting verification.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)
}

impl FromRequestParts<Arc<AppState>> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state.tokens.verify(token).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            ApiError::Unauthorized
        })
    }
}

impl Claims {
    /// Self-access rule for routes scoped to the caller's own records: the
    /// email named in the path must equal the authenticated subject's email.
    pub fn ensure_self(&self, email: &str) -> Result<(), ApiError> {
        if self.email == email {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// The authenticated caller, looked up in the store and confirmed to hold
/// the admin role.
pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = Claims::from_request_parts(parts, state).await?;
        require_admin(state, &claims).await
    }
}

/// Stage 2 of the gate, also called directly by handlers whose route shape
/// overlaps a differently-gated method.
pub async fn require_admin(state: &AppState, claims: &Claims) -> Result<AdminUser, ApiError> {
    let user = state
        .store
        .find_user_by_email(&claims.email)
        .await?
        .ok_or(ApiError::Forbidden)?;

    if user.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(AdminUser(user))
}
