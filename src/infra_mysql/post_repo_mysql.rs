use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: PostId,
    user_id: UserId,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        PostRecord {
            post_id: row.post_id,
            user_id: row.user_id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const FEED_OLDER: &str = r#"
SELECT post_id, user_id, title, content, created_at, updated_at
FROM post
WHERE user_id = ? AND created_at < ?
ORDER BY created_at DESC
LIMIT ?
"#;

const FEED_NEWER: &str = r#"
SELECT post_id, user_id, title, content, created_at, updated_at
FROM post
WHERE user_id = ? AND created_at > ?
ORDER BY created_at ASC
LIMIT ?
"#;

pub struct MySqlPostRepo {
    pool: MySqlPool,
}

impl MySqlPostRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepo for MySqlPostRepo {
    async fn insert(&self, post: &PostRecord) -> Result<(), PostError> {
        sqlx::query(
            r#"
INSERT INTO post (post_id, user_id, title, content, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(post.post_id)
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PostError::Store(format!("insert post: {e}")))?;

        Ok(())
    }

    async fn query_feed(&self, query: &FeedQuery) -> Result<Vec<PostRecord>, PostError> {
        let (sql, cursor) = match (query.bound, query.order) {
            (CreatedAtBound::Before(cursor), SortOrder::Descending) => (FEED_OLDER, cursor),
            (CreatedAtBound::After(cursor), SortOrder::Ascending) => (FEED_NEWER, cursor),
            _ => return Err(PostError::InvalidParams("unsupported feed query")),
        };

        let rows: Vec<PostRow> = sqlx::query_as(sql)
            .bind(query.user_id)
            .bind(cursor)
            .bind(query.limit.get() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PostError::Store(format!("query feed: {e}")))?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn get(&self, post_id: PostId) -> Result<Option<PostRecord>, PostError> {
        let row: Option<PostRow> = sqlx::query_as(
            r#"
SELECT post_id, user_id, title, content, created_at, updated_at
FROM post
WHERE post_id = ?
"#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PostError::Store(format!("query post: {e}")))?;

        Ok(row.map(PostRecord::from))
    }

    async fn delete(&self, post_id: PostId) -> Result<(), PostError> {
        sqlx::query("DELETE FROM post WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PostError::Store(format!("delete post: {e}")))?;

        Ok(())
    }
}
