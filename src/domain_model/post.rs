use crate::domain_model::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct PostId(pub uuid::Uuid);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostRecord {
    pub post_id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied feed position, before validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub cursor: Option<DateTime<Utc>>,
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedAtBound {
    Before(DateTime<Utc>),
    After(DateTime<Utc>),
}

impl CreatedAtBound {
    pub fn admits(&self, created_at: DateTime<Utc>) -> bool {
        match *self {
            CreatedAtBound::Before(cursor) => created_at < cursor,
            CreatedAtBound::After(cursor) => created_at > cursor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One keyset query against a user's posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub user_id: UserId,
    pub bound: CreatedAtBound,
    pub order: SortOrder,
    pub limit: PageLimit,
}
