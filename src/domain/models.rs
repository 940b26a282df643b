use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

pub const DEFAULT_CAMPAIGN_STATUS: &str = "ativa";

/// Stored as free text. Roles other than `admin` are kept verbatim and carry
/// no extra permissions.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    #[default]
    Admin,
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Other(raw) => raw,
        }
    }
}

impl FromStr for UserRole {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(UserRole::from(raw.to_string()))
    }
}

impl From<String> for UserRole {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("admin") {
            UserRole::Admin
        } else {
            UserRole::Other(raw)
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => "admin".to_string(),
            UserRole::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Campaign {
    pub id: i64,
    pub company_name: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/campaigns`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCampaign {
    pub company_name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Dimension {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SurveyResponse {
    pub id: i64,
    pub campaign_id: i64,
    pub dimension_id: i64,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// One (dimension name, score) pair of a campaign, as joined from responses.
#[derive(Debug, Clone, FromRow)]
pub struct DimensionScore {
    pub dimension: String,
    pub score: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Answer {
    pub dimension: String,
    pub score: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveySubmission {
    pub campaign_id: i64,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub struct CampaignSummary {
    pub campaign: Campaign,
    pub averages: BTreeMap<String, f64>,
}
