// src/handlers/post_handlers.rs
use actix_multipart::{Multipart, MultipartError};
use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use futures::TryStreamExt;
use log::{debug, error, warn};
use thiserror::Error;

use super::render;
use crate::dtos::post_dtos::ImageUpload;
use crate::services::composer_service::{ComposerFields, PostComposer, SubmitOutcome};
use crate::AppState;

/// Cap on everything one create-post form may carry, images included.
const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
enum FormError {
    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("form exceeds the upload limit")]
    TooLarge,
}

#[derive(Template)]
#[template(path = "post.html")]
struct ComposeTemplate<'a> {
    fields: &'a ComposerFields,
    notice: Option<String>,
}

/// GET /post
#[get("/post")]
pub async fn compose_form() -> HttpResponse {
    render(&ComposeTemplate {
        fields: &ComposerFields::default(),
        notice: None,
    })
}

/// POST /post
/// Forwards the browser's multipart form to the API as one submission.
#[post("/post")]
pub async fn create_post(app_state: web::Data<AppState>, mut payload: Multipart) -> HttpResponse {
    let mut composer = PostComposer::new(app_state.api.clone());
    match read_form(&mut payload, &mut composer).await {
        Ok(()) => debug!("Create-post form read, {} image(s)", composer.images().len()),
        Err(FormError::TooLarge) => {
            warn!("Create-post form over {} bytes, not submitted", MAX_FORM_BYTES);
            return render(&ComposeTemplate {
                fields: composer.fields(),
                notice: Some("Images are too large to upload (10 MB in total).".to_string()),
            });
        }
        Err(e) => {
            error!("Failed to read create-post form: {}", e);
            return render(&ComposeTemplate {
                fields: composer.fields(),
                notice: None,
            });
        }
    }

    let notice = match composer.submit().await {
        SubmitOutcome::Created { message } => {
            Some(message.unwrap_or_else(|| "Post created".to_string()))
        }
        SubmitOutcome::Rejected { .. } | SubmitOutcome::Failed => None,
    };

    render(&ComposeTemplate {
        fields: composer.fields(),
        notice,
    })
}

async fn read_form(payload: &mut Multipart, composer: &mut PostComposer) -> Result<(), FormError> {
    let mut total = 0usize;
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field
            .content_type()
            .cloned()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            total += chunk.len();
            if total > MAX_FORM_BYTES {
                return Err(FormError::TooLarge);
            }
            data.extend_from_slice(&chunk);
        }

        if name == "images" {
            // An untouched file input still sends an empty, nameless part.
            match file_name.filter(|n| !n.is_empty()) {
                Some(file_name) => composer.attach_image(ImageUpload {
                    file_name,
                    content_type,
                    data,
                }),
                None => debug!("Skipping empty file part"),
            }
            continue;
        }

        let value = String::from_utf8_lossy(&data).into_owned();
        let fields = composer.fields_mut();
        match name.as_str() {
            "email" => fields.email = value,
            "title" => fields.title = value,
            "description" => fields.description = value,
            "tags" => fields.tags = value,
            other => debug!("Ignoring form field {:?}", other),
        }
    }
    Ok(())
}
