//! In-process store used by the test suite.
use super::{StoreError, SurveyStore};
use crate::domain::models::{
    Answer, Campaign, Dimension, DimensionScore, NewCampaign, NewUser, SurveyResponse, User,
    DEFAULT_CAMPAIGN_STATUS,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub campaigns: Vec<Campaign>,
    pub dimensions: Vec<Dimension>,
    pub responses: Vec<SurveyResponse>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_on_dimension: Option<String>,
}

impl MemoryStore {
    /// A store whose `record_answers` fails upon reaching the given dimension name.
    pub fn failing_on(dimension: &str) -> Self {
        Self {
            fail_on_dimension: Some(dimension.to_string()),
            ..Default::default()
        }
    }

    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Resource already exists".to_string()));
        }
        let created = User {
            id: tables.next_id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, StoreError> {
        let mut tables = self.tables();
        let id = tables.next_id();
        // Spread creation times so ordering by timestamp is observable.
        let created = Campaign {
            id,
            company_name: campaign.company_name,
            title: campaign.title,
            description: campaign.description,
            status: DEFAULT_CAMPAIGN_STATUS.to_string(),
            created_at: Utc::now() + Duration::milliseconds(id),
        };
        tables.campaigns.push(created.clone());
        Ok(created)
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        let mut campaigns = self.tables().campaigns.clone();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(campaigns)
    }

    async fn find_campaign(&self, id: i64) -> Result<Option<Campaign>, StoreError> {
        Ok(self.tables().campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_campaign(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        if !tables.campaigns.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        tables.responses.retain(|r| r.campaign_id != id);
        tables.campaigns.retain(|c| c.id != id);
        Ok(true)
    }

    async fn campaign_scores(&self, campaign_id: i64) -> Result<Vec<DimensionScore>, StoreError> {
        let tables = self.tables();
        let scores = tables
            .responses
            .iter()
            .filter(|r| r.campaign_id == campaign_id)
            .filter_map(|r| {
                tables
                    .dimensions
                    .iter()
                    .find(|d| d.id == r.dimension_id)
                    .map(|d| DimensionScore {
                        dimension: d.name.clone(),
                        score: r.score,
                    })
            })
            .collect();
        Ok(scores)
    }

    async fn record_answers(
        &self,
        campaign_id: i64,
        answers: &[Answer],
    ) -> Result<Option<Vec<SurveyResponse>>, StoreError> {
        let mut guard = self.tables();
        if !guard.campaigns.iter().any(|c| c.id == campaign_id) {
            return Ok(None);
        }

        // Work on a copy and swap it in only once every answer succeeded.
        let mut staged = Tables {
            users: Vec::new(),
            campaigns: Vec::new(),
            dimensions: guard.dimensions.clone(),
            responses: guard.responses.clone(),
            next_id: guard.next_id,
        };
        let mut recorded = Vec::with_capacity(answers.len());
        for answer in answers {
            if self.fail_on_dimension.as_deref() == Some(answer.dimension.as_str()) {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            let dimension_id = match staged.dimensions.iter().find(|d| d.name == answer.dimension) {
                Some(existing) => existing.id,
                None => {
                    let id = staged.next_id();
                    staged.dimensions.push(Dimension {
                        id,
                        name: answer.dimension.clone(),
                        description: None,
                    });
                    id
                }
            };
            let response = SurveyResponse {
                id: staged.next_id(),
                campaign_id,
                dimension_id,
                score: answer.score,
                created_at: Utc::now(),
            };
            staged.responses.push(response.clone());
            recorded.push(response);
        }

        guard.dimensions = staged.dimensions;
        guard.responses = staged.responses;
        guard.next_id = staged.next_id;
        Ok(Some(recorded))
    }
}
