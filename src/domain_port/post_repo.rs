use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait PostRepo: Send + Sync {
    async fn insert(&self, post: &PostRecord) -> Result<(), PostError>;

    /// Rows matching `query`, in `query.order`, at most `query.limit` of them.
    async fn query_feed(&self, query: &FeedQuery) -> Result<Vec<PostRecord>, PostError>;

    async fn get(&self, post_id: PostId) -> Result<Option<PostRecord>, PostError>;

    async fn delete(&self, post_id: PostId) -> Result<(), PostError>;
}
