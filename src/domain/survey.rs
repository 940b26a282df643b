//! Anonymous survey intake and public link resolution.
use crate::db::SurveyStore;
use crate::domain::models::SurveySubmission;
use crate::error::AppError;

/// Stores every answer of a submission, or none of them.
/// Returns the number of responses written.
pub async fn submit_answers(
    store: &dyn SurveyStore,
    submission: &SurveySubmission,
) -> Result<usize, AppError> {
    let recorded = store
        .record_answers(submission.campaign_id, &submission.answers)
        .await?
        .ok_or(AppError::NotFound("Campaign"))?;
    Ok(recorded.len())
}

pub fn survey_url(frontend_url: &str, campaign_id: i64) -> String {
    format!(
        "{}/survey.html?campaign_id={}",
        frontend_url.trim_end_matches('/'),
        campaign_id
    )
}

pub async fn submission_link(
    store: &dyn SurveyStore,
    frontend_url: &str,
    campaign_id: i64,
) -> Result<String, AppError> {
    store
        .find_campaign(campaign_id)
        .await?
        .ok_or(AppError::NotFound("Campaign"))?;
    Ok(survey_url(frontend_url, campaign_id))
}
