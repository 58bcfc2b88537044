// src/handlers/viewpost_handlers.rs
use actix_web::{get, post, web, HttpResponse, HttpResponseBuilder};
use askama::Template;

use super::{render, see_other};
use crate::dtos::form_dtos::{CommentForm, DeleteForm};
use crate::middleware::client_storage::ClientStorage;
use crate::models::post::Post;
use crate::services::post_detail_service::{
    CommentOutcome, DeleteOutcome, DetailState, LikeOutcome, PostDetail,
};
use crate::AppState;

#[derive(Template)]
#[template(path = "viewpost.html")]
struct ViewPostTemplate<'a> {
    post: Option<&'a Post>,
    error: Option<&'a str>,
    notice: Option<&'a str>,
    image_url: Option<String>,
    has_liked: bool,
    is_owner: bool,
    signed_in: bool,
    comment_draft: &'a str,
}

#[derive(Template)]
#[template(path = "confirm_delete.html")]
struct ConfirmDeleteTemplate<'a> {
    post_id: &'a str,
    title: &'a str,
}

fn detail_for(app_state: &AppState, post_id: &str, storage: &ClientStorage) -> PostDetail {
    PostDetail::new(app_state.api.clone(), post_id)
        .viewed_by(storage.email())
        .already_liked(storage.has_liked(post_id))
}

/// 303 back to the post's page.
fn back_to_post(detail: &PostDetail) -> HttpResponseBuilder {
    see_other(&format!("/viewpost/{}", urlencoding::encode(detail.post_id())))
}

fn page<'a>(app_state: &AppState, detail: &'a PostDetail, notice: Option<&'a str>) -> ViewPostTemplate<'a> {
    let error = match detail.state() {
        DetailState::Error(message) => Some(message.as_str()),
        _ => None,
    };
    ViewPostTemplate {
        post: detail.post(),
        error,
        notice,
        image_url: detail.post().and_then(|p| p.thumbnail_url(&app_state.api_base)),
        has_liked: detail.has_liked(),
        is_owner: detail.is_owner(),
        signed_in: detail.viewer_email().is_some(),
        comment_draft: detail.comment_draft(),
    }
}

/// GET /viewpost/{id}
#[get("/viewpost/{id}")]
pub async fn view_post(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    storage: ClientStorage,
) -> HttpResponse {
    let mut detail = detail_for(&app_state, &path, &storage);
    detail.fetch_post().await;
    render(&page(&app_state, &detail, None))
}

/// POST /viewpost/{id}/like
#[post("/viewpost/{id}/like")]
pub async fn like_post(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    storage: ClientStorage,
) -> HttpResponse {
    let post_id = path.into_inner();
    let mut detail = detail_for(&app_state, &post_id, &storage);

    match detail.add_like().await {
        LikeOutcome::Liked => back_to_post(&detail)
            .cookie(storage.liked_cookie(&post_id))
            .finish(),
        LikeOutcome::AlreadyLiked | LikeOutcome::Failed => back_to_post(&detail).finish(),
    }
}

/// POST /viewpost/{id}/comment
#[post("/viewpost/{id}/comment")]
pub async fn comment_post(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    storage: ClientStorage,
    form: web::Form<CommentForm>,
) -> HttpResponse {
    let mut detail = detail_for(&app_state, &path, &storage);
    detail.set_comment_draft(form.into_inner().text);

    let notice = match detail.add_comment().await {
        CommentOutcome::Posted => return back_to_post(&detail).finish(),
        CommentOutcome::SignedOut => {
            detail.fetch_post().await;
            Some("Sign in to comment.")
        }
        CommentOutcome::Empty | CommentOutcome::Failed => {
            detail.fetch_post().await;
            None
        }
    };
    render(&page(&app_state, &detail, notice))
}

/// GET /viewpost/{id}/delete
/// Asks before anything is deleted.
#[get("/viewpost/{id}/delete")]
pub async fn confirm_delete(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    storage: ClientStorage,
) -> HttpResponse {
    let mut detail = detail_for(&app_state, &path, &storage);
    detail.fetch_post().await;
    match detail.post() {
        Some(post) => render(&ConfirmDeleteTemplate {
            post_id: &post.id,
            title: &post.title,
        }),
        None => render(&page(&app_state, &detail, None)),
    }
}

/// POST /viewpost/{id}/delete
/// Deletes only when the confirmation form said yes.
#[post("/viewpost/{id}/delete")]
pub async fn delete_post(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    storage: ClientStorage,
    form: web::Form<DeleteForm>,
) -> HttpResponse {
    let post_id = path.into_inner();
    let mut detail = detail_for(&app_state, &post_id, &storage);

    match detail.delete_post(|| form.is_confirmed()).await {
        DeleteOutcome::Deleted => see_other("/").finish(),
        DeleteOutcome::Cancelled => back_to_post(&detail).finish(),
        DeleteOutcome::Failed => {
            detail.fetch_post().await;
            render(&page(&app_state, &detail, Some("Could not delete the post.")))
        }
    }
}
