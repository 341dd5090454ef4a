//! Shared constants used across the application.

/// Firestore collection holding blog posts.
pub const BLOGS_COLLECTION: &str = "blogs";

/// Storage key prefix for uploaded post images.
///
/// Full object keys look like `blog-images/{millis}_{filename}` so repeated
/// uploads of the same filename never collide.
pub const IMAGE_KEY_PREFIX: &str = "blog-images";

/// Length of client-generated Firestore document identifiers.
pub const DOCUMENT_ID_LENGTH: usize = 20;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// How long success banners stay visible before auto-hiding, in milliseconds.
pub const SUCCESS_BANNER_MILLIS: u32 = 3000;

/// How long error banners stay visible before auto-hiding, in milliseconds.
pub const ERROR_BANNER_MILLIS: u32 = 5000;

/// Maximum characters of a post description shown on a list card.
pub const CARD_DESCRIPTION_CHARS: usize = 150;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;
