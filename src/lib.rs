pub mod api;
pub mod backend;
pub mod config;
pub mod datamodel;

pub use backend::{BlogStore, StoreError};
pub use datamodel::fjall_impl::FjallStore;
pub use datamodel::mem_impl::MemStore;
pub use datamodel::{Blog, BlogId, NewBlog};
