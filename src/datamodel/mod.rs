use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub mod fjall_impl;
pub mod mem_impl;

/// The store-assigned ID of a `Blog`
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BlogId(Uuid);

impl BlogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The raw key under which the blog is stored.
    pub fn key(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn from_key(key: &[u8]) -> Result<Self, uuid::Error> {
        Uuid::from_slice(key).map(Self)
    }
}

impl Default for BlogId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for BlogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
}

/// A blog as submitted by a client, before the store has assigned it an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBlog {
    pub title: String,
    pub author: String,
    pub url: String,
    #[serde(default, deserialize_with = "likes_or_zero")]
    pub likes: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`{field}` is required and must not be empty")]
pub struct InvalidBlog {
    pub field: &'static str,
}

impl NewBlog {
    pub fn validate(&self) -> Result<(), InvalidBlog> {
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("url", &self.url),
        ] {
            if value.trim().is_empty() {
                return Err(InvalidBlog { field });
            }
        }
        Ok(())
    }
}

/// Anything that is not a JSON number counts as zero likes.
fn likes_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let likes = match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|likes| likes.trunc() as i64))
            .unwrap_or(0),
        _ => 0,
    };
    Ok(likes)
}

pub mod document {
    use super::*;

    /// What actually lands in the store: a blog minus its id, which is the key.
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
    pub struct BlogDocument {
        pub title: String,
        pub author: String,
        pub url: String,
        pub likes: i64,
    }

    impl BlogDocument {
        pub fn into_blog(self, id: BlogId) -> Blog {
            Blog {
                id,
                title: self.title,
                author: self.author,
                url: self.url,
                likes: self.likes,
            }
        }
    }

    impl From<NewBlog> for BlogDocument {
        fn from(blog: NewBlog) -> Self {
            Self {
                title: blog.title,
                author: blog.author,
                url: blog.url,
                likes: blog.likes,
            }
        }
    }
}

mod dbg {
    use super::*;
    use core::fmt;

    impl fmt::Debug for BlogId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "BlogId({})", self.0)
        }
    }

    impl fmt::Display for BlogId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt::Display::fmt(&self.0, f)
        }
    }
}
