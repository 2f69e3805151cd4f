use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("invalid params: {0}")]
    InvalidParams(&'static str),
    #[error("post not found")]
    NotFound,
    #[error("post belongs to another user")]
    Forbidden,
    #[error("store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    async fn save_post(&self, author: UserId, post: NewPost) -> Result<PostRecord, PostError>;
    async fn next_posts(
        &self,
        user_id: UserId,
        params: PaginationParams,
    ) -> Result<Vec<PostRecord>, PostError>;
    async fn delete_post(&self, requester: UserId, post_id: PostId) -> Result<(), PostError>;
}
