// src/services/post_detail_service.rs
use std::sync::Arc;

use log::{error, info, warn};

use crate::dtos::post_dtos::CommentIn;
use crate::models::post::Post;
use crate::repositories::ArtApi;

pub const FETCH_FAILED: &str = "Failed to fetch post";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Ready(Post),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    /// This browser already liked the post; nothing was sent.
    AlreadyLiked,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOutcome {
    Posted,
    /// Blank comment body; nothing was sent.
    Empty,
    /// No cached email to author the comment; nothing was sent.
    SignedOut,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user did not confirm; nothing was sent.
    Cancelled,
    Failed,
}

/// State of the single-post page. Every successful mutation is followed by a
/// full re-fetch; nothing is patched locally apart from the liked flag.
pub struct PostDetail {
    api: Arc<dyn ArtApi>,
    post_id: String,
    viewer_email: Option<String>,
    has_liked: bool,
    comment_draft: String,
    state: DetailState,
}

impl PostDetail {
    pub fn new(api: Arc<dyn ArtApi>, post_id: impl Into<String>) -> Self {
        Self {
            api,
            post_id: post_id.into(),
            viewer_email: None,
            has_liked: false,
            comment_draft: String::new(),
            state: DetailState::Loading,
        }
    }

    /// Email of the acting user, as cached by the browser.
    pub fn viewed_by(mut self, email: Option<&str>) -> Self {
        self.viewer_email = email.map(str::to_string);
        self
    }

    /// Carries over the liked flag the browser remembered.
    pub fn already_liked(mut self, liked: bool) -> Self {
        self.has_liked = liked;
        self
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn post(&self) -> Option<&Post> {
        match &self.state {
            DetailState::Ready(post) => Some(post),
            _ => None,
        }
    }

    pub fn has_liked(&self) -> bool {
        self.has_liked
    }

    pub fn viewer_email(&self) -> Option<&str> {
        self.viewer_email.as_deref()
    }

    pub fn comment_draft(&self) -> &str {
        &self.comment_draft
    }

    pub fn set_comment_draft(&mut self, text: impl Into<String>) {
        self.comment_draft = text.into();
    }

    /// Display-only: whether to offer the delete button. The API decides
    /// whether a delete is allowed.
    pub fn is_owner(&self) -> bool {
        match (self.post(), self.viewer_email()) {
            (Some(post), Some(email)) => post.is_created_by(email),
            _ => false,
        }
    }

    pub async fn fetch_post(&mut self) {
        self.state = DetailState::Loading;
        self.state = match self.api.fetch_post(&self.post_id).await {
            Ok(post) => DetailState::Ready(post),
            Err(e) => {
                error!("Error fetching post {}: {}", self.post_id, e);
                DetailState::Error(FETCH_FAILED.to_string())
            }
        };
    }

    pub async fn add_like(&mut self) -> LikeOutcome {
        if self.has_liked {
            return LikeOutcome::AlreadyLiked;
        }
        match self.api.add_like(&self.post_id).await {
            Ok(()) => {
                info!("Liked post {}", self.post_id);
                self.has_liked = true;
                self.fetch_post().await;
                LikeOutcome::Liked
            }
            Err(e) => {
                error!("Error adding like to {}: {}", self.post_id, e);
                LikeOutcome::Failed
            }
        }
    }

    /// Posts the current draft. The draft is cleared only when the API
    /// accepted the comment.
    pub async fn add_comment(&mut self) -> CommentOutcome {
        if self.comment_draft.trim().is_empty() {
            return CommentOutcome::Empty;
        }
        let Some(author) = self.viewer_email.clone() else {
            warn!("Comment on {} attempted without a cached email", self.post_id);
            return CommentOutcome::SignedOut;
        };

        let comment = CommentIn {
            author,
            text: self.comment_draft.clone(),
        };
        match self.api.add_comment(&self.post_id, &comment).await {
            Ok(()) => {
                info!("Comment added to post {}", self.post_id);
                self.comment_draft.clear();
                self.fetch_post().await;
                CommentOutcome::Posted
            }
            Err(e) => {
                error!("Error adding comment to {}: {}", self.post_id, e);
                CommentOutcome::Failed
            }
        }
    }

    /// `confirm` is asked first; the DELETE is only sent when it says yes.
    pub async fn delete_post<F>(&mut self, confirm: F) -> DeleteOutcome
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            return DeleteOutcome::Cancelled;
        }
        match self.api.delete_post(&self.post_id).await {
            Ok(()) => {
                info!("Deleted post {}", self.post_id);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!("Error deleting post {}: {}", self.post_id, e);
                DeleteOutcome::Failed
            }
        }
    }
}
