//! User profiles: create-or-fetch, lookup and partial updates.

use std::sync::Arc;

use domains::{Creation, DomainError, DomainResult, StoreOutcome, User, UserPatch, UserRepository};

use crate::conflict::ConflictResolver;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    resolver: Arc<ConflictResolver>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, resolver: Arc<ConflictResolver>) -> Self {
        Self { users, resolver }
    }

    pub async fn create(&self, user: User) -> DomainResult<Creation<User, Vec<User>>> {
        let creation = self.resolver.create_user(&user).await?;
        if creation.is_created() {
            tracing::info!(nickname = %user.nickname, "user created");
        }
        Ok(creation)
    }

    pub async fn profile(&self, nickname: &str) -> DomainResult<User> {
        self.users
            .find_user(nickname)
            .await?
            .ok_or_else(|| DomainError::UserUnknown(nickname.to_string()))
    }

    /// Applies the non-empty fields of `patch`; an empty patch just reads the profile.
    pub async fn update_profile(&self, nickname: &str, patch: UserPatch) -> DomainResult<User> {
        if patch.is_empty() {
            return self.profile(nickname).await;
        }
        match self.users.update_user(nickname, &patch).await? {
            StoreOutcome::Applied(user) => Ok(user),
            StoreOutcome::NotFound => Err(DomainError::UserUnknown(nickname.to_string())),
            StoreOutcome::UniqueViolation => Err(DomainError::Conflict(format!(
                "email {} is already registered",
                patch.email.unwrap_or_default()
            ))),
            StoreOutcome::ForeignKeyViolation => Err(DomainError::Internal(format!(
                "profile update for {nickname} violated a foreign key"
            ))),
        }
    }
}
