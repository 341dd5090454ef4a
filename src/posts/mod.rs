//! Blog post domain: the model, the fixed category set, and the service
//! that carries out every create/read/update/delete against the backend.

pub mod model;
pub mod service;

pub use model::{
    category_emoji, Author, Category, ImageUpload, ListOrder, Post, PostContent, PostFilter,
};
pub use service::{BlogError, BlogService};
