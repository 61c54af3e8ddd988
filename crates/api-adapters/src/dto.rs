//! Wire shapes of request bodies and query strings, and their conversion
//! into service inputs. Response bodies are the domain models themselves.

use chrono::{DateTime, Utc};
use domains::{
    DomainResult, NewForum, PageRequest, Related, SortMode, ThreadListing, ThreadPatch, User,
    UserListing, UserPatch,
};
use serde::Deserialize;
use services::{PostDraft, ThreadDraft};

/// Body of `POST /user/{nickname}/create`; the nickname comes from the path.
#[derive(Debug, Deserialize)]
pub struct UserCreateBody {
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

impl UserCreateBody {
    pub fn into_user(self, nickname: String) -> User {
        User {
            nickname,
            fullname: self.fullname,
            about: self.about,
            email: self.email,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdateBody {
    pub fullname: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
}

impl From<UserUpdateBody> for UserPatch {
    fn from(body: UserUpdateBody) -> Self {
        UserPatch::from_fields(body.fullname, body.about, body.email)
    }
}

pub type ForumCreateBody = NewForum;

/// Body of `POST /forum/{slug}/create`. A `forum` field, if sent, is
/// ignored in favour of the path.
#[derive(Debug, Deserialize)]
pub struct ThreadCreateBody {
    pub title: String,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl From<ThreadCreateBody> for ThreadDraft {
    fn from(body: ThreadCreateBody) -> Self {
        ThreadDraft {
            title: body.title,
            author: body.author,
            message: body.message,
            slug: body.slug,
            created: body.created,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThreadUpdateBody {
    pub title: Option<String>,
    pub message: Option<String>,
}

impl From<ThreadUpdateBody> for ThreadPatch {
    fn from(body: ThreadUpdateBody) -> Self {
        ThreadPatch::from_fields(body.title, body.message)
    }
}

#[derive(Debug, Deserialize)]
pub struct PostCreateBody {
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
}

impl From<PostCreateBody> for PostDraft {
    fn from(body: PostCreateBody) -> Self {
        PostDraft {
            parent: body.parent,
            author: body.author,
            message: body.message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostUpdateBody {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteBody {
    pub nickname: String,
    pub voice: i64,
}

/// `?limit&since&sort&desc` on a thread's posts.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostsQuery {
    pub limit: Option<i64>,
    pub since: Option<i64>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

impl PostsQuery {
    pub fn into_page(self) -> DomainResult<PageRequest> {
        let sort: SortMode = self.sort.as_deref().unwrap_or_default().parse()?;
        Ok(PageRequest::new(
            self.limit,
            self.since,
            self.desc.unwrap_or(false),
            sort,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThreadsQuery {
    pub limit: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    pub desc: Option<bool>,
}

impl From<ThreadsQuery> for ThreadListing {
    fn from(query: ThreadsQuery) -> Self {
        ThreadListing::new(query.limit, query.since, query.desc.unwrap_or(false))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UsersQuery {
    pub limit: Option<i64>,
    pub since: Option<String>,
    pub desc: Option<bool>,
}

impl From<UsersQuery> for UserListing {
    fn from(query: UsersQuery) -> Self {
        UserListing::new(query.limit, query.since, query.desc.unwrap_or(false))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RelatedQuery {
    pub related: Option<String>,
}

impl From<RelatedQuery> for Related {
    fn from(query: RelatedQuery) -> Self {
        query.related.as_deref().map(Related::parse).unwrap_or_default()
    }
}
