use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use fjall::{PersistMode, TransactionalKeyspace, TransactionalPartitionHandle};
use tempfile::TempDir;

use super::document::BlogDocument;
use super::*;
use crate::backend::{BlogStore, StoreError};

const BLOGS_PARTITION: &str = "blogs";

/// Blogs persisted in a transactional fjall keyspace.
///
/// Keys are the raw bytes of the [`BlogId`], values are postcard-encoded
/// [`BlogDocument`]s.
pub struct FjallStore {
    database: TransactionalKeyspace,
    blogs: TransactionalPartitionHandle,
    closed: AtomicBool,
    // declared last, so the keyspace is dropped before its directory is removed
    tempdir: Option<TempDir>,
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_in(path.as_ref(), None)
    }

    /// Opens a throwaway keyspace that is deleted once the store is dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().to_owned();
        Self::open_in(&path, Some(tempdir))
    }

    fn open_in(path: &Path, tempdir: Option<TempDir>) -> Result<Self, StoreError> {
        let database = fjall::Config::new(path).open_transactional()?;
        let blogs = database.open_partition(BLOGS_PARTITION, Default::default())?;

        Ok(Self {
            database,
            blogs,
            closed: AtomicBool::new(false),
            tempdir,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.tempdir.as_ref().map(TempDir::path)
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    /// Runs `op` on tokio's blocking pool, keeping the caller's tracing span.
    ///
    /// fjall reads and writes are synchronous and may hit the disk, so they
    /// must not run on the async worker threads.
    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&TransactionalKeyspace, &TransactionalPartitionHandle) -> Result<T, StoreError>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let database = self.database.clone();
        let blogs = self.blogs.clone();
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| op(&database, &blogs))).await?
    }
}

fn decode(key: &[u8], value: &[u8]) -> Result<Blog, StoreError> {
    let id = BlogId::from_key(key)?;
    let document: BlogDocument = postcard::from_bytes(value)?;
    Ok(document.into_blog(id))
}

#[async_trait::async_trait]
impl BlogStore for FjallStore {
    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        self.check_open()?;

        let id = BlogId::new();
        let document = BlogDocument::from(blog);
        let value = postcard::to_stdvec(&document)?;

        self.blocking(move |database, blogs| {
            let mut write_tx = database.write_tx()?;
            write_tx.insert(blogs, id.key(), value);
            write_tx.commit()?.map_err(|_| StoreError::Conflict)
        })
        .await?;

        Ok(document.into_blog(id))
    }

    async fn find_all(&self) -> Result<Vec<Blog>, StoreError> {
        self.check_open()?;

        self.blocking(|database, blogs| {
            database
                .read_tx()
                .iter(blogs)
                .map(|kv| {
                    let (key, value) = kv?;
                    decode(&key, &value)
                })
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, id: BlogId) -> Result<Option<Blog>, StoreError> {
        self.check_open()?;

        let value = self
            .blocking(move |database, blogs| Ok(database.read_tx().get(blogs, id.key())?))
            .await?;
        let Some(value) = value else {
            return Ok(None);
        };
        let document: BlogDocument = postcard::from_bytes(&value)?;

        Ok(Some(document.into_blog(id)))
    }

    async fn replace(&self, id: BlogId, blog: NewBlog) -> Result<Option<Blog>, StoreError> {
        self.check_open()?;

        let document = BlogDocument::from(blog);
        let value = postcard::to_stdvec(&document)?;

        let replaced = self
            .blocking(move |database, blogs| {
                let mut write_tx = database.write_tx()?;
                if !write_tx.contains_key(blogs, id.key())? {
                    return Ok(false);
                }
                write_tx.insert(blogs, id.key(), value);
                write_tx.commit()?.map_err(|_| StoreError::Conflict)?;
                Ok(true)
            })
            .await?;

        Ok(replaced.then(|| document.into_blog(id)))
    }

    async fn delete(&self, id: BlogId) -> Result<bool, StoreError> {
        self.check_open()?;

        self.blocking(move |database, blogs| {
            let mut write_tx = database.write_tx()?;
            if !write_tx.contains_key(blogs, id.key())? {
                return Ok(false);
            }
            write_tx.remove(blogs, id.key());
            write_tx.commit()?.map_err(|_| StoreError::Conflict)?;
            Ok(true)
        })
        .await
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        self.check_open()?;

        self.blocking(|database, blogs| {
            // read through the removing transaction, so a concurrent insert conflicts
            let mut write_tx = database.write_tx()?;
            let keys = write_tx.keys(blogs).collect::<Result<Vec<_>, _>>()?;
            let removed = keys.len();
            for key in keys {
                write_tx.remove(blogs, key);
            }
            write_tx.commit()?.map_err(|_| StoreError::Conflict)?;
            Ok(removed)
        })
        .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.blocking(|database, _| Ok(database.persist(PersistMode::SyncAll)?))
            .await?;
        tracing::debug!("fjall blog store persisted and closed");
        Ok(())
    }
}
