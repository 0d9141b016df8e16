use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::document::BlogDocument;
use super::*;
use crate::backend::{BlogStore, StoreError};

/// A volatile store, handy when nothing needs to survive a restart.
#[derive(Debug, Default)]
pub struct MemStore {
    blogs: RwLock<HashMap<BlogId, BlogDocument>>,
    closed: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlogStore for MemStore {
    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        self.check_open()?;

        let id = BlogId::new();
        let document = BlogDocument::from(blog);
        self.blogs.write().await.insert(id, document.clone());

        Ok(document.into_blog(id))
    }

    async fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
        self.check_open()?;

        let blogs = self.blogs.read().await;
        Ok(blogs
            .iter()
            .map(|(id, document)| document.clone().into_blog(*id))
            .collect())
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, StoreError> {
        self.check_open()?;

        let blogs = self.blogs.read().await;
        Ok(blogs.get(&id).map(|document| document.clone().into_blog(id)))
    }

    async fn replace(&self, id: BlogId, blog: NewBlog) -> Result<Option<Blog>, StoreError> {
        self.check_open()?;

        let mut blogs = self.blogs.write().await;
        let Some(existing) = blogs.get_mut(&id) else {
            return Ok(None);
        };
        *existing = BlogDocument::from(blog);

        Ok(Some(existing.clone().into_blog(id)))
    }

    async fn delete(&self, id: BlogId) -> Result<bool, StoreError> {
        self.check_open()?;

        Ok(self.blogs.write().await.remove(&id).is_some())
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        self.check_open()?;

        let mut blogs = self.blogs.write().await;
        let removed = blogs.len();
        blogs.clear();
        Ok(removed)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
