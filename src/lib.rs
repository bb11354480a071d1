//! Read-only Reddit client that turns API responses into stable, serializable records.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod operations;
pub mod stats;

pub use client::{HttpSession, RedditClient, RedditSource};
pub use config::AppConfig;
pub use error::RedditClientError;
pub use models::{Comment, Post, SubredditInfo, SubredditStats};
