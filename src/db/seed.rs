use crate::config::AdminSeed;
use crate::crypto;
use crate::db::SurveyStore;
use crate::domain::models::{NewUser, UserRole};
use anyhow::Result;

/// Makes sure the configured administrator exists. An existing account with
/// the same email is left untouched, password included.
pub async fn ensure_admin(store: &dyn SurveyStore, seed: &AdminSeed) -> Result<bool> {
    if store.find_user_by_email(&seed.email).await?.is_some() {
        tracing::info!("Admin account {} already present", seed.email);
        return Ok(false);
    }

    let password_hash = crypto::hash_password(&seed.password)?;
    let user = store
        .insert_user(NewUser {
            name: seed.name.clone(),
            email: seed.email.clone(),
            password_hash,
            role: UserRole::Admin,
        })
        .await?;
    tracing::info!("Created admin account {} (id {})", user.email, user.id);
    Ok(true)
}
