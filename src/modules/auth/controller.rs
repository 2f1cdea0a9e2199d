use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use deliver_core::AppError;
use deliver_models::auth::{LoginRequest, LogoutRequest, RefreshRequest, TokenResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login with email and password, receiving an access/refresh pair.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state.auth_service.login(dto).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new pair, rotating the session.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state.auth_service.refresh(dto).await?;
    Ok(Json(tokens))
}

/// Log out the current session.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LogoutRequest>,
) -> Result<StatusCode, AppError> {
    state
        .auth_service
        .logout(&dto.access_sid, dto.refresh_token.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Log out every session of the authenticated caller.
#[instrument(skip_all, fields(user_id = auth_user.user_id))]
pub async fn logout_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout_all(auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
