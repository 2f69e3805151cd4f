use super::deadline::within;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Query shape for one feed page, plus how to order what comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPlan {
    pub query: FeedQuery,
    pub reverse_result: bool,
}

impl FeedPlan {
    /// Validates caller input and picks the keyset query.
    ///
    /// Older-than-cursor pages are fetched newest first and returned as is.
    /// Newer-than-cursor pages are fetched oldest first, so the limit keeps the
    /// rows closest to the cursor, and then flipped back to newest first.
    pub fn resolve(user_id: UserId, params: &PaginationParams) -> Result<FeedPlan, PostError> {
        let limit = params
            .limit
            .ok_or(PostError::InvalidParams("limit is required"))
            .and_then(|l| PageLimit::new(l).ok_or(PostError::InvalidParams("limit must be 1..=5")))?;
        let cursor = params
            .cursor
            .ok_or(PostError::InvalidParams("cursor is required"))?;

        let (bound, order) = if params.reverse {
            (CreatedAtBound::After(cursor), SortOrder::Ascending)
        } else {
            (CreatedAtBound::Before(cursor), SortOrder::Descending)
        };

        Ok(FeedPlan {
            query: FeedQuery {
                user_id,
                bound,
                order,
                limit,
            },
            reverse_result: params.reverse,
        })
    }

    pub fn finish(&self, mut rows: Vec<PostRecord>) -> Vec<PostRecord> {
        rows.truncate(self.query.limit.get());
        if self.reverse_result {
            rows.reverse();
        }
        rows
    }
}

pub struct RealPostService {
    post_repo: Arc<dyn PostRepo>,
    query_timeout: Duration,
}

impl RealPostService {
    pub fn new(post_repo: Arc<dyn PostRepo>, query_timeout: Duration) -> Self {
        Self {
            post_repo,
            query_timeout,
        }
    }

    fn elapsed(limit: Duration) -> PostError {
        PostError::Store(format!("timed out after {limit:?}"))
    }
}

#[async_trait::async_trait]
impl PostService for RealPostService {
    async fn save_post(&self, author: UserId, post: NewPost) -> Result<PostRecord, PostError> {
        let NewPost { title, content } = post;
        if title.trim().is_empty() {
            return Err(PostError::InvalidParams("title is required"));
        }

        // DATETIME(6) keeps microseconds only.
        let now = Utc::now().trunc_subsecs(6);
        let record = PostRecord {
            post_id: PostId(Uuid::new_v4()),
            user_id: author,
            title,
            content,
            created_at: now,
            updated_at: now,
        };
        within(
            self.query_timeout,
            self.post_repo.insert(&record),
            Self::elapsed,
        )
        .await?;

        debug!(post_id = %record.post_id, user_id = %author, "post saved");
        Ok(record)
    }

    async fn next_posts(
        &self,
        user_id: UserId,
        params: PaginationParams,
    ) -> Result<Vec<PostRecord>, PostError> {
        let plan = FeedPlan::resolve(user_id, &params)?;
        let rows = within(
            self.query_timeout,
            self.post_repo.query_feed(&plan.query),
            Self::elapsed,
        )
        .await?;
        Ok(plan.finish(rows))
    }

    async fn delete_post(&self, requester: UserId, post_id: PostId) -> Result<(), PostError> {
        let post = within(self.query_timeout, self.post_repo.get(post_id), Self::elapsed)
            .await?
            .ok_or(PostError::NotFound)?;
        if post.user_id != requester {
            trace!(%post_id, %requester, "delete refused, not the author");
            return Err(PostError::Forbidden);
        }

        within(
            self.query_timeout,
            self.post_repo.delete(post_id),
            Self::elapsed,
        )
        .await?;
        debug!(%post_id, "post deleted");
        Ok(())
    }
}
