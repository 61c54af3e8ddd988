//! # PostStore
//!
//! Batch insertion with path assignment, single-post reads and edits, and
//! the three cursor-paginated traversals of a thread's posts:
//!
//! * flat: id order, cursor on id.
//! * tree: `path_key` order, cursor on the since post's path.
//! * parent_tree: the first `limit` root posts past the since post's root,
//!   each followed by its entire subtree in tree order. Descending flips
//!   the order of the roots only.

use async_trait::async_trait;
use domains::{
    DomainError, DomainResult, NewPost, PageRequest, Post, PostPath, PostRepository, Thread,
};
use sqlx::{QueryBuilder, Sqlite};

use super::path_index::PathIndex;
use super::rows::{into_posts, PostRow, POST_SELECT};
use super::{encode_time, internal, key, SqliteStore};

impl SqliteStore {
    async fn fetch_posts(&self, mut query: QueryBuilder<'_, Sqlite>) -> DomainResult<Vec<Post>> {
        let rows: Vec<PostRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        into_posts(rows)
    }
}

#[async_trait]
impl PostRepository for SqliteStore {
    async fn add_posts(&self, thread: &Thread, posts: &[NewPost]) -> DomainResult<Vec<Post>> {
        let mut tx = self.pool.begin().await.map_err(internal)?;
        let forum_key = key(&thread.forum);
        let mut index = PathIndex::new();
        let mut ids = Vec::with_capacity(posts.len());

        for post in posts {
            // Writing before reading takes SQLite's write lock up front, so
            // the parent lookups below cannot be invalidated mid-batch.
            let inserted = sqlx::query_scalar::<_, i64>(
                "INSERT INTO posts (parent, author_key, message, forum_key, thread_id, created) \
                 VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
            )
            .bind(post.parent)
            .bind(key(&post.author))
            .bind(&post.message)
            .bind(&forum_key)
            .bind(thread.id)
            .bind(encode_time(post.created))
            .fetch_one(&mut *tx)
            .await;

            let id = match inserted {
                Ok(id) => id,
                Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                    tracing::debug!(thread_id = thread.id, author = %post.author, "batch rejected: unknown author");
                    return Err(DomainError::UserUnknown(post.author.clone()));
                }
                Err(err) => return Err(internal(err)),
            };
            // The new row is visible to the lookup, so it counts as part of
            // the batch before its own parent is resolved.
            index.record(id);

            let parent = index.lookup(&mut tx, thread.id, post.parent_id()).await?;
            let path = PostPath::assign(parent, id).inspect_err(|_| {
                tracing::debug!(thread_id = thread.id, parent = post.parent, "batch rejected: parent not in thread");
            })?;

            sqlx::query("UPDATE posts SET path_key = ?, root_id = ? WHERE id = ?")
                .bind(path.sort_key())
                .bind(path.root_id())
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(internal)?;

            ids.push(id);
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);
        query.push(" WHERE p.id IN (");
        let mut separated = query.separated(", ");
        for id in &ids {
            separated.push_bind(*id);
        }
        query.push(") ORDER BY p.id");
        let rows: Vec<PostRow> = query
            .build_query_as()
            .fetch_all(&mut *tx)
            .await
            .map_err(internal)?;
        let inserted = into_posts(rows)?;

        tx.commit().await.map_err(internal)?;
        Ok(inserted)
    }

    async fn find_post(&self, id: i64) -> DomainResult<Option<Post>> {
        let row: Option<PostRow> = sqlx::query_as(&format!("{POST_SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?;
        row.map(PostRow::into_post).transpose()
    }

    async fn update_message(&self, id: i64, message: &str) -> DomainResult<Option<Post>> {
        let done = sqlx::query("UPDATE posts SET message = ?, is_edited = 1 WHERE id = ?")
            .bind(message)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal)?;
        if done.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_post(id).await
    }

    async fn list_flat(&self, thread_id: i64, page: &PageRequest) -> DomainResult<Vec<Post>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);
        query.push(" WHERE p.thread_id = ").push_bind(thread_id);
        if let Some(since) = page.since {
            query
                .push(if page.desc { " AND p.id < " } else { " AND p.id > " })
                .push_bind(since);
        }
        query
            .push(if page.desc { " ORDER BY p.id DESC" } else { " ORDER BY p.id ASC" })
            .push(" LIMIT ")
            .push_bind(i64::from(page.limit));
        self.fetch_posts(query).await
    }

    async fn list_tree(&self, thread_id: i64, page: &PageRequest) -> DomainResult<Vec<Post>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);
        query.push(" WHERE p.thread_id = ").push_bind(thread_id);
        if let Some(since) = page.since {
            // An unknown cursor compares against NULL and matches nothing.
            query
                .push(if page.desc { " AND p.path_key < " } else { " AND p.path_key > " })
                .push("(SELECT path_key FROM posts WHERE id = ")
                .push_bind(since)
                .push(")");
        }
        query
            .push(if page.desc {
                " ORDER BY p.path_key DESC"
            } else {
                " ORDER BY p.path_key ASC"
            })
            .push(" LIMIT ")
            .push_bind(i64::from(page.limit));
        self.fetch_posts(query).await
    }

    async fn list_parent_tree(&self, thread_id: i64, page: &PageRequest) -> DomainResult<Vec<Post>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);
        query
            .push(" WHERE p.root_id IN (SELECT id FROM posts WHERE thread_id = ")
            .push_bind(thread_id)
            .push(" AND parent = 0");
        if let Some(since) = page.since {
            query
                .push(if page.desc { " AND id < " } else { " AND id > " })
                .push("(SELECT root_id FROM posts WHERE id = ")
                .push_bind(since)
                .push(")");
        }
        query
            .push(if page.desc { " ORDER BY id DESC" } else { " ORDER BY id ASC" })
            .push(" LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(")")
            .push(if page.desc {
                " ORDER BY p.root_id DESC, p.path_key ASC"
            } else {
                " ORDER BY p.path_key ASC"
            });
        self.fetch_posts(query).await
    }
}
