use async_trait::async_trait;
use thiserror::Error;

use crate::dtos::post_dtos::{CommentIn, CreatePostResponse, PostSubmission};
use crate::models::post::Post;
use crate::models::user::UserProfile;

pub mod kalarasa_repo;
#[cfg(test)]
pub(crate) mod mock;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Server(String),
    #[error("not found")]
    NotFound,
}

impl ApiError {
    /// True when the API answered and put an `error` field in its reply, as
    /// opposed to a transport, status or decoding failure.
    pub fn is_server_reported(&self) -> bool {
        matches!(self, ApiError::Server(_))
    }

    /// Message for the page: the server's own words when it sent some,
    /// otherwise the caller's fixed fallback.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Server(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// The remote art API. Every page reaches persistence through this trait
/// only; nothing is stored locally.
#[async_trait]
pub trait ArtApi: Send + Sync {
    async fn retrieve_all_posts(&self) -> Result<Vec<Post>, ApiError>;
    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError>;
    async fn create_post(&self, submission: PostSubmission)
        -> Result<CreatePostResponse, ApiError>;
    async fn add_like(&self, id: &str) -> Result<(), ApiError>;
    async fn add_comment(&self, id: &str, comment: &CommentIn) -> Result<(), ApiError>;
    async fn delete_post(&self, id: &str) -> Result<(), ApiError>;

    async fn get_profile(&self, email: &str) -> Result<UserProfile, ApiError>;
    /// `email` is the key; `profile.email` is not consulted.
    async fn update_profile(&self, email: &str, profile: &UserProfile) -> Result<(), ApiError>;
}
