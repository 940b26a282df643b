use crate::db::SurveyStore;
use crate::domain::models::User;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

pub const TOKEN_TTL_HOURS: i64 = 8;

/// JWT payload. `sub` carries the user id as a decimal string.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("expired")]
    Expired,
    #[error("bad subject")]
    Subject,
    #[error("signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: Some(user.email.clone()),
            role: Some(user.role.as_str().to_string()),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        let claims = data.claims;
        let user_id = claims.sub.parse::<i64>().map_err(|_| TokenError::Subject)?;
        Ok(SessionClaims {
            user_id,
            email: claims.email,
            role: claims.role,
            exp: claims.exp,
        })
    }
}

/// Token from `Authorization: Bearer <token>`; the scheme is matched case-insensitively.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Axum extractor resolving the bearer token to a stored user.
///
/// Usage:
/// ```ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> Result<...> {
///     // user is the authenticated account
/// }
/// ```
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let shared_state = SharedState::from_ref(state);

        let token = extract_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let claims = shared_state.tokens.validate(&token).map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            AppError::Unauthorized
        })?;

        let user = shared_state
            .store
            .find_user_by_id(claims.user_id)
            .await
            .map_err(|e| {
                tracing::warn!("User lookup failed for token: {}", e);
                AppError::Unauthorized
            })?;

        let Some(user) = user else {
            tracing::warn!("Token subject {} does not resolve to a user", claims.user_id);
            return Err(AppError::Unauthorized);
        };

        tracing::debug!(
            "Authenticated user {} ({:?}, role {:?}, expires at {})",
            user.id,
            claims.email,
            claims.role,
            claims.exp
        );
        Ok(CurrentUser(user))
    }
}
