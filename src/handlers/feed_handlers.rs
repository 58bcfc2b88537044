// src/handlers/feed_handlers.rs
use actix_web::{get, web, HttpResponse};
use askama::Template;

use super::render;
use crate::dtos::form_dtos::SearchQuery;
use crate::services::feed_service::{FeedCard, FeedLoader, FeedState};
use crate::AppState;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate<'a> {
    query: &'a str,
    cards: Vec<FeedCard<'a>>,
    error: Option<&'a str>,
    page_height: u32,
    shown: usize,
    total: usize,
}

/// GET /home?q=
/// All posts, filtered by the search box.
#[get("/home")]
pub async fn home(app_state: web::Data<AppState>, query: web::Query<SearchQuery>) -> HttpResponse {
    let mut feed = FeedLoader::new(app_state.api.clone());
    feed.set_query(query.into_inner().q.unwrap_or_default());
    feed.load().await;

    let error = match feed.state() {
        FeedState::Failed(message) => Some(message.as_str()),
        _ => None,
    };

    render(&HomeTemplate {
        query: feed.query(),
        cards: feed.cards(&app_state.api_base),
        error,
        page_height: feed.page_height(),
        shown: feed.filtered_len(),
        total: feed.posts().len(),
    })
}
