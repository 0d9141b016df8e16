use crate::datamodel::{Blog, BlogId, NewBlog};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("the blog store has been closed")]
    Closed,
    #[error("database error: {0}")]
    Database(#[from] fjall::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode or decode a blog document: {0}")]
    Encoding(#[from] postcard::Error),
    #[error("invalid document key: {0}")]
    InvalidKey(#[from] uuid::Error),
    #[error("write transaction conflicted with a concurrent write")]
    Conflict,
    #[error("blocking store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The document store holding the blog collection.
///
/// Every method touches the collection atomically. Once `close` has been
/// called, all further operations fail with [`StoreError::Closed`].
#[async_trait::async_trait]
pub trait BlogStore: Send + Sync + 'static {
    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError>;

    async fn find_all(&self) -> Result<Vec<Blog>, StoreError>;

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, StoreError>;

    /// Returns `None` if no blog with that id exists.
    async fn replace(&self, id: BlogId, blog: NewBlog) -> Result<Option<Blog>, StoreError>;

    /// Returns whether a blog was actually removed.
    async fn delete(&self, id: BlogId) -> Result<bool, StoreError>;

    async fn delete_all(&self) -> Result<usize, StoreError>;

    async fn close(&self) -> Result<(), StoreError>;
}
