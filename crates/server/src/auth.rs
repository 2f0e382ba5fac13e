use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use models::actor::Actor;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Any caller holding a valid JWT
pub struct AuthUser(pub Actor);

/// A caller whose JWT subject is listed in `ADMIN_SUBJECTS`
pub struct AdminUser(pub Actor);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let sub = parts
            .extensions
            .get::<DefaultClaims>()
            .and_then(|claims| claims.sub.clone())
            .ok_or(ApiError::Unauthorized)?;

        let is_admin = state.config.is_admin(&sub);
        Ok(Self(Actor::new(sub, is_admin)))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(actor) = AuthUser::from_request_parts(parts, state).await?;
        if !actor.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(Self(actor))
    }
}
