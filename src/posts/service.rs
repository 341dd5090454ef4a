//! Typed command/query surface over the backend clients.
//!
//! Handlers call this; nothing here knows about rendering. Every operation
//! takes an optional bearer token so the same service works for signed-in
//! users, guests, and tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use super::model::{Author, ImageUpload, ListOrder, Post, PostContent, PostFilter};
use crate::constants::BLOGS_COLLECTION;
use crate::firebase::firestore::{generate_document_id, FieldValue, FirestoreClient};
use crate::firebase::storage::{image_object_key, StorageClient};
use crate::firebase::FirebaseError;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("blog post not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] FirebaseError),
}

/// The blog operations behind every page.
#[derive(Debug, Clone)]
pub struct BlogService {
    firestore: FirestoreClient,
    storage: StorageClient,
}

impl BlogService {
    #[must_use]
    pub fn new(firestore: FirestoreClient, storage: StorageClient) -> Self {
        Self { firestore, storage }
    }

    /// Create a post, uploading the image first when one was attached.
    ///
    /// # Errors
    ///
    /// Returns an error when the upload or the document write fails.
    pub async fn create_post(
        &self,
        author: &Author,
        content: PostContent,
        image: Option<ImageUpload>,
        id_token: Option<&str>,
    ) -> Result<Post, BlogError> {
        let image_url = match image {
            Some(image) => Some(self.upload_image(&image, id_token).await?),
            None => None,
        };

        let id = generate_document_id();
        let created_at_client = Utc::now();
        let fields = create_fields(author, &content, image_url.as_deref(), created_at_client);
        let commit_time = self
            .firestore
            .create_document(BLOGS_COLLECTION, &id, fields, "createdAt", id_token)
            .await?;
        info!(id = %id, title = %content.title, "Created blog post");

        Ok(Post {
            id,
            title: content.title,
            category: content.category.as_str().to_string(),
            description: content.description,
            image_url,
            author_id: author.id.clone(),
            author_email: author.email.clone(),
            created_at: Some(commit_time),
            created_at_client: Some(created_at_client),
        })
    }

    /// Update a post's text fields, replacing the stored image URL only when
    /// a new image was attached. Owner identity and creation timestamps are
    /// never touched.
    ///
    /// # Errors
    ///
    /// Returns an error when the upload or the document write fails.
    pub async fn update_post(
        &self,
        id: &str,
        content: PostContent,
        image: Option<ImageUpload>,
        id_token: Option<&str>,
    ) -> Result<(), BlogError> {
        let image_url = match image {
            Some(image) => Some(self.upload_image(&image, id_token).await?),
            None => None,
        };

        let fields = update_fields(&content, image_url.as_deref());
        self.firestore
            .update_document(BLOGS_COLLECTION, id, fields, "updatedAt", id_token)
            .await?;
        info!(id = %id, "Updated blog post");
        Ok(())
    }

    /// Delete a post and best-effort delete its image blob.
    ///
    /// The blob goes first; if that fails the document still gets deleted
    /// and the failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::NotFound`] when the post does not exist, or the
    /// backend error when the document deletion fails.
    pub async fn delete_post(&self, id: &str, id_token: Option<&str>) -> Result<(), BlogError> {
        let Some(post) = self.fetch_post(id, id_token).await? else {
            return Err(BlogError::NotFound);
        };

        if let Some(image_url) = &post.image_url {
            if let Some(key) = self.storage.object_key_from_url(image_url) {
                if let Err(e) = self.storage.delete_object(&key, id_token).await {
                    debug!(id = %id, "Image already deleted or does not exist: {e}");
                }
            }
        }

        self.firestore
            .delete_document(BLOGS_COLLECTION, id, id_token)
            .await?;
        info!(id = %id, "Deleted blog post");
        Ok(())
    }

    /// List posts matching the filter, newest first by the given order key.
    ///
    /// # Errors
    ///
    /// Returns an error when the query fails.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        order: ListOrder,
        id_token: Option<&str>,
    ) -> Result<Vec<Post>, BlogError> {
        let order_field = match order {
            ListOrder::ServerTime => "createdAt",
            ListOrder::ClientTime => "createdAtClient",
        };
        let filter_clause = match filter {
            PostFilter::All => None,
            PostFilter::Category(category) => {
                Some(("category", FieldValue::string(category.as_str())))
            }
            PostFilter::Author(author_id) => {
                Some(("userId", FieldValue::string(author_id.clone())))
            }
        };

        let documents = self
            .firestore
            .query_collection(BLOGS_COLLECTION, filter_clause, order_field, true, id_token)
            .await?;
        Ok(documents.iter().map(Post::from_document).collect())
    }

    /// Fetch one post by identifier. Missing posts are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than not-found.
    pub async fn fetch_post(
        &self,
        id: &str,
        id_token: Option<&str>,
    ) -> Result<Option<Post>, BlogError> {
        let document = self
            .firestore
            .get_document(BLOGS_COLLECTION, id, id_token)
            .await?;
        Ok(document.as_ref().map(Post::from_document))
    }

    async fn upload_image(
        &self,
        image: &ImageUpload,
        id_token: Option<&str>,
    ) -> Result<String, BlogError> {
        let key = image_object_key(&image.filename, Utc::now());
        let content_type = if image.content_type.is_empty() {
            mime_guess::from_path(&image.filename)
                .first_or_octet_stream()
                .to_string()
        } else {
            image.content_type.clone()
        };
        let url = self
            .storage
            .upload_bytes(&image.data, &key, &content_type, id_token)
            .await?;
        Ok(url)
    }
}

/// Firestore fields for a new post. `createdAt` is not here; the server
/// assigns it through the commit transform.
fn create_fields(
    author: &Author,
    content: &PostContent,
    image_url: Option<&str>,
    created_at_client: DateTime<Utc>,
) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), FieldValue::string(&content.title));
    fields.insert(
        "category".to_string(),
        FieldValue::string(content.category.as_str()),
    );
    fields.insert(
        "description".to_string(),
        FieldValue::string(&content.description),
    );
    fields.insert(
        "imageUrl".to_string(),
        image_url.map_or_else(FieldValue::null, FieldValue::string),
    );
    fields.insert("userId".to_string(), FieldValue::string(&author.id));
    fields.insert("userEmail".to_string(), FieldValue::string(&author.email));
    fields.insert(
        "createdAtClient".to_string(),
        FieldValue::integer(created_at_client.timestamp_millis()),
    );
    fields
}

/// Firestore fields for an edit: the text fields, plus `imageUrl` only when
/// a replacement was uploaded. The commit mask keeps everything else intact.
fn update_fields(content: &PostContent, image_url: Option<&str>) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), FieldValue::string(&content.title));
    fields.insert(
        "category".to_string(),
        FieldValue::string(content.category.as_str()),
    );
    fields.insert(
        "description".to_string(),
        FieldValue::string(&content.description),
    );
    if let Some(url) = image_url {
        fields.insert("imageUrl".to_string(), FieldValue::string(url));
    }
    fields
}
