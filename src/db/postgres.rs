use super::{StoreError, SurveyStore};
use crate::domain::models::{
    Answer, Campaign, Dimension, DimensionScore, NewCampaign, NewUser, SurveyResponse, User,
    UserRole, DEFAULT_CAMPAIGN_STATUS,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(150) NOT NULL,
        email VARCHAR(150) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        role VARCHAR(50) NOT NULL DEFAULT 'admin',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS campaigns (
        id BIGSERIAL PRIMARY KEY,
        company_name VARCHAR(200) NOT NULL,
        title VARCHAR(200) NOT NULL,
        description TEXT,
        status VARCHAR(50) NOT NULL DEFAULT 'ativa',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dimensions (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS responses (
        id BIGSERIAL PRIMARY KEY,
        campaign_id BIGINT NOT NULL REFERENCES campaigns(id),
        dimension_id BIGINT NOT NULL REFERENCES dimensions(id),
        score INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_responses_campaign ON responses (campaign_id)",
    "CREATE INDEX IF NOT EXISTS idx_campaigns_created_at ON campaigns (created_at DESC)",
];

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.map(UserRole::from).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates missing tables and indexes. Safe to run on every start.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

async fn find_dimension(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<Dimension>, StoreError> {
    let dimension = sqlx::query_as::<_, Dimension>(
        "SELECT id, name, description FROM dimensions WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(dimension)
}

async fn resolve_dimension(conn: &mut PgConnection, name: &str) -> Result<Dimension, StoreError> {
    if let Some(existing) = find_dimension(&mut *conn, name).await? {
        return Ok(existing);
    }

    // A concurrent submission may have created the same name in the meantime.
    let inserted = sqlx::query_as::<_, Dimension>(
        r#"
        INSERT INTO dimensions (name) VALUES ($1)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name, description
        "#,
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;
    if let Some(created) = inserted {
        tracing::debug!("Created dimension '{}' with id {}", created.name, created.id);
        return Ok(created);
    }

    find_dimension(&mut *conn, name)
        .await?
        .ok_or_else(|| StoreError::Database(sqlx::Error::RowNotFound))
}

#[async_trait]
impl SurveyStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(User::from(row))
    }

    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, StoreError> {
        let created = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (company_name, title, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_name, title, description, status, created_at
            "#,
        )
        .bind(&campaign.company_name)
        .bind(&campaign.title)
        .bind(&campaign.description)
        .bind(DEFAULT_CAMPAIGN_STATUS)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        let campaigns = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT id, company_name, title, description, status, created_at
            FROM campaigns
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(campaigns)
    }

    async fn find_campaign(&self, id: i64) -> Result<Option<Campaign>, StoreError> {
        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            SELECT id, company_name, title, description, status, created_at
            FROM campaigns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(campaign)
    }

    async fn delete_campaign(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM campaigns WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(false);
        }

        let removed = sqlx::query("DELETE FROM responses WHERE campaign_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!("Deleted campaign {} with {} responses", id, removed);
        Ok(true)
    }

    async fn campaign_scores(&self, campaign_id: i64) -> Result<Vec<DimensionScore>, StoreError> {
        let scores = sqlx::query_as::<_, DimensionScore>(
            r#"
            SELECT d.name AS dimension, r.score
            FROM responses r
            JOIN dimensions d ON d.id = r.dimension_id
            WHERE r.campaign_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(scores)
    }

    async fn record_answers(
        &self,
        campaign_id: i64,
        answers: &[Answer],
    ) -> Result<Option<Vec<SurveyResponse>>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Holds off a concurrent delete until this batch commits.
        let campaign: Option<i64> =
            sqlx::query_scalar("SELECT id FROM campaigns WHERE id = $1 FOR KEY SHARE")
                .bind(campaign_id)
                .fetch_optional(&mut *tx)
                .await?;
        if campaign.is_none() {
            return Ok(None);
        }

        let mut recorded = Vec::with_capacity(answers.len());
        for answer in answers {
            let dimension = resolve_dimension(&mut *tx, &answer.dimension).await?;
            let response = sqlx::query_as::<_, SurveyResponse>(
                r#"
                INSERT INTO responses (campaign_id, dimension_id, score)
                VALUES ($1, $2, $3)
                RETURNING id, campaign_id, dimension_id, score, created_at
                "#,
            )
            .bind(campaign_id)
            .bind(dimension.id)
            .bind(answer.score)
            .fetch_one(&mut *tx)
            .await?;
            recorded.push(response);
        }

        tx.commit().await?;
        Ok(Some(recorded))
    }
}
