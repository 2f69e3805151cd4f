use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryPostRepo {
    posts: DashMap<PostId, PostRecord>,
    unavailable: AtomicBool,
    queries: AtomicUsize,
}

impl MemoryPostRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of calls that reached the repo.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), PostError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            Err(PostError::Store("memory repo switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PostRepo for MemoryPostRepo {
    async fn insert(&self, post: &PostRecord) -> Result<(), PostError> {
        self.enter()?;
        self.posts.insert(post.post_id, post.clone());
        Ok(())
    }

    async fn query_feed(&self, query: &FeedQuery) -> Result<Vec<PostRecord>, PostError> {
        self.enter()?;
        let mut rows: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|p| p.user_id == query.user_id && query.bound.admits(p.created_at))
            .map(|p| p.value().clone())
            .collect();

        rows.sort_by(|a, b| (a.created_at, a.post_id).cmp(&(b.created_at, b.post_id)));
        if query.order == SortOrder::Descending {
            rows.reverse();
        }
        rows.truncate(query.limit.get());
        Ok(rows)
    }

    async fn get(&self, post_id: PostId) -> Result<Option<PostRecord>, PostError> {
        self.enter()?;
        Ok(self.posts.get(&post_id).map(|p| p.value().clone()))
    }

    async fn delete(&self, post_id: PostId) -> Result<(), PostError> {
        self.enter()?;
        self.posts.remove(&post_id);
        Ok(())
    }
}
