// src/repositories/kalarasa_repo.rs
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use urlencoding::encode;

use super::{ApiError, ArtApi};
use crate::dtos::post_dtos::{CommentIn, CreatePostResponse, PostSubmission};
use crate::dtos::profile_dtos::{ProfileEnvelope, ProfileLookup, ProfileUpdate, UpdateAck};
use crate::models::post::Post;
use crate::models::user::UserProfile;

/// HTTP client for the Kalarasa API (e.g. https://thecodeworks.in/kalarasa).
#[derive(Clone)]
pub struct KalarasaApi {
    client: Client,
    base_url: String,
}

impl KalarasaApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn post_url(&self, endpoint: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, endpoint, encode(id))
    }
}

/// Body of a 2xx reply, or `ApiError::Status` carrying the body otherwise.
async fn success_body(resp: Response) -> Result<String, ApiError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(text)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let text = success_body(resp).await?;
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl ArtApi for KalarasaApi {
    async fn retrieve_all_posts(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.url("retrieve_all_posts");
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }

    async fn fetch_post(&self, id: &str) -> Result<Post, ApiError> {
        let url = self.post_url("fetch_post", id);
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        decode(resp).await
    }

    async fn create_post(
        &self,
        submission: PostSubmission,
    ) -> Result<CreatePostResponse, ApiError> {
        let url = self.url("create_post");
        debug!(
            "POST {} (multipart, {} image(s))",
            url,
            submission.images.len()
        );

        let mut form = Form::new()
            .text("email", submission.email)
            .text("title", submission.title)
            .text("description", submission.description)
            .text("tags", submission.tags);
        for image in submission.images {
            let part = Part::bytes(image.data)
                .file_name(image.file_name)
                .mime_str(image.content_type.as_ref())?;
            form = form.part("images", part);
        }

        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        // The API answers rejected submissions with a JSON body and a 4xx.
        match serde_json::from_str::<CreatePostResponse>(&text) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(ApiError::Serde(e)),
        }
    }

    async fn add_like(&self, id: &str) -> Result<(), ApiError> {
        let url = self.post_url("add_like", id);
        debug!("POST {}", url);
        let resp = self.client.post(&url).send().await?;
        success_body(resp).await.map(|_| ())
    }

    async fn add_comment(&self, id: &str, comment: &CommentIn) -> Result<(), ApiError> {
        let url = self.post_url("add_comment", id);
        debug!("POST {}", url);
        let resp = self.client.post(&url).json(comment).send().await?;
        success_body(resp).await.map(|_| ())
    }

    async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        let url = self.post_url("delete_post", id);
        debug!("DELETE {}", url);
        let resp = self.client.delete(&url).send().await?;
        success_body(resp).await.map(|_| ())
    }

    async fn get_profile(&self, email: &str) -> Result<UserProfile, ApiError> {
        let url = self.url("get_profile");
        debug!("POST {} for {}", url, email);
        let resp = self
            .client
            .post(&url)
            .json(&ProfileLookup { email })
            .send()
            .await?;

        let envelope: ProfileEnvelope = decode(resp).await?;
        if let Some(err) = envelope.error {
            return Err(ApiError::Server(err));
        }
        envelope.user.ok_or(ApiError::NotFound)
    }

    async fn update_profile(&self, email: &str, profile: &UserProfile) -> Result<(), ApiError> {
        let url = self.url("update_profile");
        debug!("POST {} for {}", url, email);
        let resp = self
            .client
            .post(&url)
            .json(&ProfileUpdate::new(email, profile))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let ack = if text.trim().is_empty() {
            UpdateAck::default()
        } else {
            match serde_json::from_str::<UpdateAck>(&text) {
                Ok(ack) => ack,
                Err(e) if status.is_success() => {
                    warn!("update_profile replied with unreadable body: {}", e);
                    UpdateAck::default()
                }
                Err(_) => UpdateAck::default(),
            }
        };

        if let Some(err) = ack.error {
            return Err(ApiError::Server(err));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(())
    }
}
