use actix_web::{get, HttpResponse};
use askama::Template;

use super::render;
use crate::middleware::client_storage::ClientStorage;

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    signed_in: bool,
}

/// GET /
#[get("/")]
pub async fn landing(storage: ClientStorage) -> HttpResponse {
    render(&LandingTemplate {
        signed_in: storage.email().is_some(),
    })
}
