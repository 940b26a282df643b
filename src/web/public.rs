//! Unauthenticated survey endpoints.
use crate::domain::models::SurveySubmission;
use crate::domain::survey;
use crate::error::AppError;
use crate::state::SharedState;
use crate::web::extract::{ApiJson, ApiPath};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct LinkResponse {
    pub url: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/public/surveys/submit", post(submit_survey))
        .route("/public/surveys/:id/link", get(public_link))
        .with_state(state)
}

async fn submit_survey(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<SurveySubmission>,
) -> Result<Json<SubmitResponse>, AppError> {
    let written = survey::submit_answers(state.store.as_ref(), &payload).await?;
    tracing::info!(
        "Recorded {} answers for campaign {}",
        written,
        payload.campaign_id
    );
    Ok(Json(SubmitResponse { ok: true }))
}

async fn public_link(
    State(state): State<SharedState>,
    ApiPath(campaign_id): ApiPath<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let url =
        survey::submission_link(state.store.as_ref(), &state.frontend_url, campaign_id).await?;
    Ok(Json(LinkResponse { url }))
}
