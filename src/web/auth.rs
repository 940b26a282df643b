use crate::crypto;
use crate::db::SurveyStore;
use crate::domain::models::{User, UserRole};
use crate::error::AppError;
use crate::state::SharedState;
use crate::web::extract::ApiForm;
use crate::web::session::CurrentUser;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// OAuth2 password-grant form; `username` carries the email.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserProfile,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(state)
}

async fn login(
    State(state): State<SharedState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.store.find_user_by_email(&form.username).await?;
    let stored_hash = user
        .as_ref()
        .map_or(crypto::DUMMY_HASH, |u| u.password_hash.as_str());
    let verified = crypto::verify_password(&form.password, stored_hash);

    let Some(user) = user.filter(|_| verified) else {
        tracing::warn!("Failed login attempt for {}", form.username);
        return Err(AppError::InvalidCredentials);
    };

    let access_token = state.tokens.issue(&user).map_err(|e| {
        tracing::error!("Failed to issue token for user {}: {}", user.id, e);
        AppError::Internal
    })?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user: UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
