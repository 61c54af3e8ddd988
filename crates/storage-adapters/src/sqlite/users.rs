use async_trait::async_trait;
use domains::{DomainResult, StoreOutcome, User, UserPatch, UserRepository};

use super::rows::{UserRow, USER_COLUMNS};
use super::{classify, internal, key, updated, SqliteStore};

#[async_trait]
impl UserRepository for SqliteStore {
    async fn insert_user(&self, user: &User) -> DomainResult<StoreOutcome<User>> {
        let result = sqlx::query(
            "INSERT INTO users (nickname_key, nickname, fullname, about, email, email_key) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(key(&user.nickname))
        .bind(&user.nickname)
        .bind(&user.fullname)
        .bind(&user.about)
        .bind(&user.email)
        .bind(key(&user.email))
        .execute(&self.pool)
        .await;

        Ok(classify(result)?.map(|_| user.clone()))
    }

    async fn find_user(&self, nickname: &str) -> DomainResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{USER_COLUMNS} WHERE u.nickname_key = ?"))
            .bind(key(nickname))
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        Ok(row.map(User::from))
    }

    async fn find_users_by_nickname_or_email(&self, nickname: &str, email: &str) -> DomainResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "{USER_COLUMNS} WHERE u.nickname_key = ? OR u.email_key = ? ORDER BY u.nickname_key"
        ))
        .bind(key(nickname))
        .bind(key(email))
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, nickname: &str, patch: &UserPatch) -> DomainResult<StoreOutcome<User>> {
        let result = sqlx::query(
            "UPDATE users SET \
                fullname = COALESCE(?, fullname), \
                about = COALESCE(?, about), \
                email = COALESCE(?, email), \
                email_key = COALESCE(?, email_key) \
             WHERE nickname_key = ?",
        )
        .bind(patch.fullname.as_deref())
        .bind(patch.about.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.email.as_deref().map(key))
        .bind(key(nickname))
        .execute(&self.pool)
        .await;

        match updated(result)? {
            StoreOutcome::Applied(()) => Ok(self
                .find_user(nickname)
                .await?
                .map_or(StoreOutcome::NotFound, StoreOutcome::Applied)),
            StoreOutcome::UniqueViolation => Ok(StoreOutcome::UniqueViolation),
            StoreOutcome::ForeignKeyViolation => Ok(StoreOutcome::ForeignKeyViolation),
            StoreOutcome::NotFound => Ok(StoreOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{store, user};

    #[tokio::test]
    async fn nickname_and_email_are_unique_ignoring_case() {
        let store = store().await;
        assert!(matches!(store.insert_user(&user("Ferris")).await.unwrap(), StoreOutcome::Applied(_)));

        let mut shouting = user("FERRIS");
        shouting.email = "other@forum.test".into();
        assert_eq!(store.insert_user(&shouting).await.unwrap(), StoreOutcome::UniqueViolation);

        let mut same_mail = user("crab");
        same_mail.email = "FERRIS@forum.test".into();
        assert_eq!(store.insert_user(&same_mail).await.unwrap(), StoreOutcome::UniqueViolation);

        let found = store.find_user("fErRiS").await.unwrap().unwrap();
        assert_eq!(found.nickname, "Ferris");
    }

    #[tokio::test]
    async fn conflict_lookup_returns_every_holder() {
        let store = store().await;
        store.insert_user(&user("alice")).await.unwrap();
        store.insert_user(&user("bob")).await.unwrap();

        let holders = store
            .find_users_by_nickname_or_email("ALICE", "bob@forum.test")
            .await
            .unwrap();
        let names: Vec<_> = holders.iter().map(|u| u.nickname.as_str()).collect();
        assert_eq!(names, ["alice", "bob"]);
    }

    #[tokio::test]
    async fn partial_update_keeps_unset_fields() {
        let store = store().await;
        store.insert_user(&user("alice")).await.unwrap();
        store.insert_user(&user("bob")).await.unwrap();

        let patch = UserPatch::from_fields(Some("Alice Liddell".into()), None, None);
        let updated = store.update_user("alice", &patch).await.unwrap().applied().unwrap();
        assert_eq!(updated.fullname, "Alice Liddell");
        assert_eq!(updated.email, "alice@forum.test");

        let taken = UserPatch::from_fields(None, None, Some("Bob@forum.test".into()));
        assert_eq!(store.update_user("alice", &taken).await.unwrap(), StoreOutcome::UniqueViolation);

        assert_eq!(store.update_user("nobody", &patch).await.unwrap(), StoreOutcome::NotFound);
    }
}
