use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder};
use askama::Template;
use log::error;

pub mod feed_handlers;
pub mod landing_handlers;
pub mod post_handlers;
pub mod profile_handlers;
pub mod session_handlers;
pub mod viewpost_handlers;

/// Renders `template` as a 200 HTML page.
pub fn render<T: Template>(template: &T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Template render error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

/// 303 to `location`; callers attach cookies before `finish()`.
pub fn see_other(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}
