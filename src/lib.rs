//! BlogHub library.
//!
//! A blogging web app backed by Firebase: accounts and sessions, blog posts
//! with optional cover images, and a server-rendered UI for browsing them.

pub mod auth;
pub mod components;
pub mod config;
pub mod constants;
pub mod firebase;
pub mod posts;
pub mod web;
