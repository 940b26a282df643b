use crate::domain::campaigns;
use crate::domain::models::{Campaign, CampaignSummary, NewCampaign};
use crate::error::AppError;
use crate::state::SharedState;
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::session::CurrentUser;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/:id", delete(delete_campaign))
        .route("/campaigns/:id/summary", get(campaign_summary))
        .with_state(state)
}

async fn create_campaign(
    CurrentUser(user): CurrentUser,
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<NewCampaign>,
) -> Result<Json<Campaign>, AppError> {
    let campaign = campaigns::create_campaign(state.store.as_ref(), payload).await?;
    tracing::info!("User {} created campaign {}", user.id, campaign.id);
    Ok(Json(campaign))
}

async fn list_campaigns(
    CurrentUser(_user): CurrentUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Campaign>>, AppError> {
    Ok(Json(campaigns::list_campaigns(state.store.as_ref()).await?))
}

async fn campaign_summary(
    CurrentUser(_user): CurrentUser,
    State(state): State<SharedState>,
    ApiPath(campaign_id): ApiPath<i64>,
) -> Result<Json<CampaignSummary>, AppError> {
    Ok(Json(
        campaigns::summarize_campaign(state.store.as_ref(), campaign_id).await?,
    ))
}

async fn delete_campaign(
    CurrentUser(user): CurrentUser,
    State(state): State<SharedState>,
    ApiPath(campaign_id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    campaigns::delete_campaign(state.store.as_ref(), campaign_id).await?;
    tracing::info!("User {} deleted campaign {}", user.id, campaign_id);
    Ok(StatusCode::NO_CONTENT)
}
