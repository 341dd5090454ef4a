//! Maud HTML template components for the web UI.
//!
//! This module provides reusable maud components for generating HTML.
//! Components are organized into submodules by functionality:
//!
//! - `layout`: Base page layout and navigation
//! - `badge`: Category badges
//! - `alert`: Flash banner messages
//! - `card`: Blog post cards and grids
//! - `form`: Form elements and input components
//!
//! # Example
//!
//! ```ignore
//! use maud::{html, Markup};
//! use crate::components::{BaseLayout, Input, Message, PostCard};
//!
//! fn my_page() -> Markup {
//!     let content = html! {
//!         h1 { "Hello World" }
//!         (Message::success("Saved!"))
//!         (Input::text("title").placeholder("Enter a title"))
//!     };
//!     BaseLayout::new("My Page", None).render(content)
//! }
//! ```

pub mod alert;
pub mod badge;
pub mod card;
pub mod form;
pub mod layout;

// Re-export layout components
pub use layout::BaseLayout;

// Re-export badge components
pub use badge::CategoryBadge;

// Re-export alert components
pub use alert::{Message, MessageKind};

// Re-export card components
pub use card::{EmptyState, PostCard, PostGrid};

// Re-export form components
pub use form::{Form, FormGroup, HiddenInput, Input, Select, SelectOption, TextArea};

/// Re-export maud for convenience
pub use maud::{html, Markup, PreEscaped, DOCTYPE};
