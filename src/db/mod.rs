#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod seed;

use crate::domain::models::{
    Answer, Campaign, DimensionScore, NewCampaign, NewUser, SurveyResponse, User,
};
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use thiserror::Error;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return StoreError::Conflict("Resource already exists".to_string())
                }
                ErrorKind::ForeignKeyViolation => {
                    return StoreError::Conflict("Referenced resource does not exist".to_string())
                }
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    return StoreError::Invalid("Missing or invalid field".to_string())
                }
                _ => {}
            }
            // string_data_right_truncation
            if db_err.code().as_deref() == Some("22001") {
                return StoreError::Invalid("Value too long".to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Persistence for users, campaigns, dimensions and responses.
///
/// Every method borrows a connection for its own duration only. Methods that
/// write more than one row run inside a single transaction.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, StoreError>;

    /// Newest first.
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError>;

    async fn find_campaign(&self, id: i64) -> Result<Option<Campaign>, StoreError>;

    /// Removes the campaign and all of its responses atomically.
    /// Returns `false` when no such campaign exists.
    async fn delete_campaign(&self, id: i64) -> Result<bool, StoreError>;

    /// Every (dimension name, score) pair recorded for the campaign.
    async fn campaign_scores(&self, campaign_id: i64) -> Result<Vec<DimensionScore>, StoreError>;

    /// Persists one response per answer, creating unseen dimensions by name.
    /// All rows are written or none are. Returns `None` without writing
    /// anything when the campaign does not exist.
    async fn record_answers(
        &self,
        campaign_id: i64,
        answers: &[Answer],
    ) -> Result<Option<Vec<SurveyResponse>>, StoreError>;
}
