//! Row shapes returned by the SELECT statements below and their mapping
//! back onto domain models.

use domains::{DomainResult, Forum, Post, PostPath, Thread, User};

use super::decode_time;

pub(crate) const USER_COLUMNS: &str = "SELECT u.nickname, u.fullname, u.about, u.email FROM users u";

pub(crate) const FORUM_SELECT: &str = "SELECT f.title, u.nickname AS owner, f.slug, f.posts, f.threads \
     FROM forums f JOIN users u ON u.nickname_key = f.owner_key";

pub(crate) const THREAD_SELECT: &str = "SELECT t.id, t.title, u.nickname AS author, f.slug AS forum, t.message, \
     (SELECT COALESCE(SUM(v.value), 0) FROM votes v WHERE v.thread_id = t.id) AS votes, \
     t.slug, t.created \
     FROM threads t \
     JOIN users u ON u.nickname_key = t.author_key \
     JOIN forums f ON f.slug_key = t.forum_key";

pub(crate) const POST_SELECT: &str = "SELECT p.id, p.parent, u.nickname AS author, p.message, p.is_edited, \
     f.slug AS forum, p.thread_id, p.created, p.path_key \
     FROM posts p \
     JOIN users u ON u.nickname_key = p.author_key \
     JOIN forums f ON f.slug_key = p.forum_key";

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    nickname: String,
    fullname: String,
    about: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            nickname: row.nickname,
            fullname: row.fullname,
            about: row.about,
            email: row.email,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ForumRow {
    title: String,
    owner: String,
    slug: String,
    posts: i64,
    threads: i64,
}

impl From<ForumRow> for Forum {
    fn from(row: ForumRow) -> Self {
        Forum {
            title: row.title,
            user: row.owner,
            slug: row.slug,
            posts: row.posts,
            threads: row.threads,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ThreadRow {
    id: i64,
    title: String,
    author: String,
    forum: String,
    message: String,
    votes: i64,
    slug: String,
    created: String,
}

impl ThreadRow {
    pub(crate) fn into_thread(self) -> DomainResult<Thread> {
        Ok(Thread {
            id: self.id,
            title: self.title,
            author: self.author,
            forum: self.forum,
            message: self.message,
            votes: self.votes,
            slug: self.slug,
            created: decode_time(&self.created)?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    id: i64,
    parent: i64,
    author: String,
    message: String,
    is_edited: bool,
    forum: String,
    thread_id: i64,
    created: String,
    path_key: String,
}

impl PostRow {
    pub(crate) fn into_post(self) -> DomainResult<Post> {
        Ok(Post {
            id: self.id,
            parent: self.parent,
            author: self.author,
            message: self.message,
            is_edited: self.is_edited,
            forum: self.forum,
            thread: self.thread_id,
            created: decode_time(&self.created)?,
            path: PostPath::from_sort_key(&self.path_key)?,
        })
    }
}

pub(crate) fn into_threads(rows: Vec<ThreadRow>) -> DomainResult<Vec<Thread>> {
    rows.into_iter().map(ThreadRow::into_thread).collect()
}

pub(crate) fn into_posts(rows: Vec<PostRow>) -> DomainResult<Vec<Post>> {
    rows.into_iter().map(PostRow::into_post).collect()
}
