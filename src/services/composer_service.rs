// src/services/composer_service.rs
use std::sync::Arc;

use log::{error, info, warn};

use crate::dtos::post_dtos::{ImageUpload, PostSubmission};
use crate::repositories::ArtApi;

/// Text fields of the create-post form, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposerFields {
    pub email: String,
    pub title: String,
    pub description: String,
    /// Comma separated; sent to the API untouched.
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created { message: Option<String> },
    /// The API answered `success: false`.
    Rejected { error: Option<String> },
    Failed,
}

/// The create-post form. No field is validated here; the API owns that.
pub struct PostComposer {
    api: Arc<dyn ArtApi>,
    fields: ComposerFields,
    images: Vec<ImageUpload>,
}

impl PostComposer {
    pub fn new(api: Arc<dyn ArtApi>) -> Self {
        Self {
            api,
            fields: ComposerFields::default(),
            images: Vec::new(),
        }
    }

    pub fn fields(&self) -> &ComposerFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ComposerFields {
        &mut self.fields
    }

    pub fn images(&self) -> &[ImageUpload] {
        &self.images
    }

    pub fn attach_image(&mut self, image: ImageUpload) {
        self.images.push(image);
    }

    pub fn reset(&mut self) {
        self.fields = ComposerFields::default();
        self.images.clear();
    }

    /// Sends the form as one multipart submission and resets it when the API
    /// reports success. Any other outcome keeps what the user entered.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let submission = PostSubmission {
            email: self.fields.email.clone(),
            title: self.fields.title.clone(),
            description: self.fields.description.clone(),
            tags: self.fields.tags.clone(),
            images: self.images.clone(),
        };

        match self.api.create_post(submission).await {
            Ok(reply) if reply.success => {
                info!("Post created: {:?}", reply.message);
                self.reset();
                SubmitOutcome::Created {
                    message: reply.message,
                }
            }
            Ok(reply) => {
                warn!("Post rejected: {:?}", reply.error);
                SubmitOutcome::Rejected { error: reply.error }
            }
            Err(e) => {
                error!("Failed to create post: {}", e);
                SubmitOutcome::Failed
            }
        }
    }
}
