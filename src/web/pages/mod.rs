//! Maud-based page templates for the web UI.
//!
//! This module contains full page implementations using maud templates.
//! Each page module exports a render function that produces the complete HTML.

pub mod auth;
pub mod detail;
pub mod editor;
pub mod home;

// Re-export page rendering functions for convenience
pub use auth::{render_auth_page, AuthMode, AuthPageParams};
pub use detail::{render_detail_page, render_not_found_page};
pub use editor::{render_editor_page, EditorPageParams};
pub use home::{render_home_page, CategoryFilter, HomePageParams};
