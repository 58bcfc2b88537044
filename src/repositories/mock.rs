use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ApiError, ArtApi};
use crate::dtos::post_dtos::{CommentIn, CreatePostResponse, PostSubmission};
use crate::models::post::{Comment, Post};
use crate::models::user::{Creator, UserProfile};

/// One request as the remote API would have seen it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ApiCall {
    RetrieveAll,
    Fetch(String),
    Create(PostSubmission),
    Like(String),
    Comment(String, CommentIn),
    Delete(String),
    GetProfile(String),
    UpdateProfile(String, UserProfile),
}

/// In-memory stand-in for the remote API that records every call.
#[derive(Default)]
pub(crate) struct InMemoryApi {
    posts: Mutex<Vec<Post>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
    calls: Mutex<Vec<ApiCall>>,
    offline: bool,
    create_reply: Option<CreatePostResponse>,
    profile_error: Option<String>,
}

impl InMemoryApi {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Default::default()
        }
    }

    /// Every call fails as if the network were down.
    pub(crate) fn unreachable() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub(crate) fn replying_to_create(mut self, reply: CreatePostResponse) -> Self {
        self.create_reply = Some(reply);
        self
    }

    pub(crate) fn rejecting_profiles(mut self, error: &str) -> Self {
        self.profile_error = Some(error.to_string());
        self
    }

    pub(crate) async fn insert_profile(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .await
            .insert(profile.email.clone(), profile);
    }

    pub(crate) async fn profile(&self, email: &str) -> Option<UserProfile> {
        self.profiles.lock().await.get(email).cloned()
    }

    pub(crate) async fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().await.iter().filter(|c| pred(c)).count()
    }

    async fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        self.calls.lock().await.push(call);
        if self.offline {
            return Err(ApiError::Status {
                status: 503,
                body: "unreachable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ArtApi for InMemoryApi {
    async fn retrieve_all_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.record(ApiCall::RetrieveAll).await?;
        Ok(self.posts.lock().await.clone())
    }

    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        self.record(ApiCall::Fetch(id.to_string())).await?;
        self.posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_post(
        &self,
        submission: PostSubmission,
    ) -> Result<CreatePostResponse, ApiError> {
        self.record(ApiCall::Create(submission)).await?;
        Ok(self.create_reply.clone().unwrap_or(CreatePostResponse {
            success: true,
            message: Some("Post created".into()),
            error: None,
        }))
    }

    async fn add_like(&self, id: &str) -> Result<(), ApiError> {
        self.record(ApiCall::Like(id.to_string())).await?;
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::NotFound)?;
        post.likes += 1;
        Ok(())
    }

    async fn add_comment(&self, id: &str, comment: &CommentIn) -> Result<(), ApiError> {
        self.record(ApiCall::Comment(id.to_string(), comment.clone()))
            .await?;
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::NotFound)?;
        post.comments.push(Comment {
            author: comment.author.clone(),
            text: comment.text.clone(),
        });
        Ok(())
    }

    async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        self.record(ApiCall::Delete(id.to_string())).await?;
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn get_profile(&self, email: &str) -> Result<UserProfile, ApiError> {
        self.record(ApiCall::GetProfile(email.to_string())).await?;
        self.profiles
            .lock()
            .await
            .get(email)
            .cloned()
            .ok_or_else(|| ApiError::Server("User not found".into()))
    }

    async fn update_profile(&self, email: &str, profile: &UserProfile) -> Result<(), ApiError> {
        self.record(ApiCall::UpdateProfile(email.to_string(), profile.clone()))
            .await?;
        if let Some(err) = &self.profile_error {
            return Err(ApiError::Server(err.clone()));
        }
        let mut stored = profile.clone();
        stored.email = email.to_string();
        self.profiles.lock().await.insert(email.to_string(), stored);
        Ok(())
    }
}

pub(crate) fn creator(email: &str, first: &str, last: &str) -> Creator {
    Creator {
        email: email.into(),
        first_name: first.into(),
        last_name: last.into(),
        phone: "+91 9876543210".into(),
        age: "30".into(),
        state: "Kerala".into(),
        address: "Fort Kochi".into(),
    }
}

pub(crate) fn post(id: &str, title: &str, description: &str, tags: &[&str], by: Creator) -> Post {
    Post {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        images: vec![format!("uploads/{}.png", id)],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        likes: 0,
        comments: vec![],
        creator: by,
    }
}

/// A small gallery used across controller and handler tests.
pub(crate) fn sample_posts() -> Vec<Post> {
    vec![
        post(
            "p1",
            "Sunset over Kovalam",
            "Oil on canvas, warm palette",
            &["Painting", "seascape"],
            creator("anu@kala.in", "Anu", "Menon"),
        ),
        post(
            "p2",
            "Madhubani Peacock",
            "Traditional Mithila motifs",
            &["folk", "Madhubani"],
            creator("ravi@kala.in", "Ravi", "Kumar"),
        ),
        post(
            "p3",
            "Clay Diyas",
            "Hand-thrown terracotta",
            &[],
            creator("sita@kala.in", "Sita", "Rao"),
        ),
        post(
            "p4",
            "Temple Doors",
            "Charcoal study of carved teak",
            &["sketch"],
            creator("anu@kala.in", "Anu", "Menon"),
        ),
    ]
}
