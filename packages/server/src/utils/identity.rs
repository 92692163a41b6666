use sea_orm::*;
use tracing::{debug, info};

use crate::entity::user;
use crate::error::AppError;
use crate::oauth::OAuthAssertion;

/// Map a provider assertion to a local user, creating one on first sign-in.
///
/// An assertion without an email is rejected before any lookup, so a known
/// account that has since hidden its email cannot sign in either.
pub async fn resolve_user<C: ConnectionTrait>(
    db: &C,
    assertion: &OAuthAssertion,
) -> Result<user::Model, AppError> {
    let email = assertion
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email can't be blank".into()))?;

    if let Some(existing) = find_by_github_id(db, assertion.provider_id).await? {
        return Ok(existing);
    }

    let new_user = user::ActiveModel {
        github_id: Set(assertion.provider_id),
        email: Set(email.to_string()),
        name: Set(assertion.name.clone()),
        avatar_url: Set(assertion.avatar_url.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(user) => {
            info!(user_id = user.id, github_id = user.github_id, "Created user");
            Ok(user)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            debug!("Concurrent first sign-in: unique constraint caught on insert");
            find_by_github_id(db, assertion.provider_id)
                .await?
                .ok_or_else(|| AppError::Internal("User missing after unique violation".into()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn find_by_github_id<C: ConnectionTrait>(
    db: &C,
    github_id: i64,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::GithubId.eq(github_id))
        .one(db)
        .await
}
