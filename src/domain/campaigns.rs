use crate::db::SurveyStore;
use crate::domain::models::{Campaign, CampaignSummary, NewCampaign};
use crate::domain::summary::average_by_dimension;
use crate::error::AppError;

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub async fn create_campaign(
    store: &dyn SurveyStore,
    input: NewCampaign,
) -> Result<Campaign, AppError> {
    let campaign = NewCampaign {
        company_name: required(&input.company_name, "company_name")?,
        title: required(&input.title, "title")?,
        description: input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    };
    Ok(store.insert_campaign(campaign).await?)
}

pub async fn list_campaigns(store: &dyn SurveyStore) -> Result<Vec<Campaign>, AppError> {
    Ok(store.list_campaigns().await?)
}

pub async fn delete_campaign(store: &dyn SurveyStore, campaign_id: i64) -> Result<(), AppError> {
    if store.delete_campaign(campaign_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Campaign"))
    }
}

pub async fn summarize_campaign(
    store: &dyn SurveyStore,
    campaign_id: i64,
) -> Result<CampaignSummary, AppError> {
    let campaign = store
        .find_campaign(campaign_id)
        .await?
        .ok_or(AppError::NotFound("Campaign"))?;
    let scores = store.campaign_scores(campaign_id).await?;
    Ok(CampaignSummary {
        campaign,
        averages: average_by_dimension(&scores),
    })
}
