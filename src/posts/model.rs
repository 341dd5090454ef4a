//! Post domain model and the fixed category set.

use chrono::{DateTime, Utc};

use crate::firebase::firestore::Document;

/// One blog entry.
///
/// `category` stays a plain string so documents written with values outside
/// the current fixed set still render; the typed [`Category`] applies to new
/// writes and to filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
    pub author_id: String,
    pub author_email: String,
    /// Server-assigned creation time; `None` until the write resolves.
    pub created_at: Option<DateTime<Utc>>,
    /// Client-assigned fallback used for ordering when server timestamps
    /// have not settled.
    pub created_at_client: Option<DateTime<Utc>>,
}

impl Post {
    /// Decode a post from its Firestore document.
    ///
    /// Missing or mistyped fields degrade to empty strings and `None` so one
    /// malformed document never takes down a whole list render.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.str_field("title").unwrap_or_default().to_string(),
            category: doc.str_field("category").unwrap_or_default().to_string(),
            description: doc.str_field("description").unwrap_or_default().to_string(),
            image_url: doc.str_field("imageUrl").map(ToString::to_string),
            author_id: doc.str_field("userId").unwrap_or_default().to_string(),
            author_email: doc.str_field("userEmail").unwrap_or_default().to_string(),
            created_at: doc.timestamp_field("createdAt"),
            created_at_client: doc
                .integer_field("createdAtClient")
                .and_then(DateTime::from_timestamp_millis),
        }
    }
}

/// Fixed category set offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Technology,
    Lifestyle,
    Travel,
    Food,
    Business,
    Health,
    Education,
    Entertainment,
    Other,
}

impl Category {
    /// Every category, in the order the editor's select lists them.
    pub const ALL: [Self; 9] = [
        Self::Technology,
        Self::Lifestyle,
        Self::Travel,
        Self::Food,
        Self::Business,
        Self::Health,
        Self::Education,
        Self::Entertainment,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Lifestyle => "Lifestyle",
            Self::Travel => "Travel",
            Self::Food => "Food",
            Self::Business => "Business",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }

    /// Emoji shown on cards and image placeholders.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Technology => "💻",
            Self::Lifestyle => "🌟",
            Self::Travel => "✈️",
            Self::Food => "🍔",
            Self::Business => "💼",
            Self::Health => "💪",
            Self::Education => "📚",
            Self::Entertainment => "🎬",
            Self::Other => "📌",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

/// Emoji for a stored category value, tolerating values outside the fixed
/// set.
#[must_use]
pub fn category_emoji(category: &str) -> &'static str {
    Category::parse(category).map_or("📌", Category::emoji)
}

/// Identity attached to a post at creation. Never rewritten by updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub email: String,
}

impl Author {
    /// Identity used when guest posting is enabled and nobody is signed in.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: "guest".to_string(),
            email: "Guest User".to_string(),
        }
    }
}

/// Text fields collected by the editor form, shared by create and update.
#[derive(Debug, Clone)]
pub struct PostContent {
    pub title: String,
    pub category: Category,
    pub description: String,
}

/// An image file captured from a multipart form.
#[derive(Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Which posts the list loader asks the backend for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post in the collection.
    All,
    /// Posts whose category equals the given value.
    Category(Category),
    /// Posts created by the given author id.
    Author(String),
}

/// Which timestamp orders a list, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Server-assigned `createdAt`.
    ServerTime,
    /// Client-assigned `createdAtClient` fallback.
    ClientTime,
}
