// src/handlers/session_handlers.rs
use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use log::{error, info};

use super::{render, see_other};
use crate::dtos::form_dtos::LoginForm;
use crate::middleware::client_storage::{sign_in_cookies, sign_out_cookies};
use crate::models::user::StoredUser;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    error: Option<&'a str>,
}

/// GET /login
#[get("/login")]
pub async fn login_form() -> HttpResponse {
    render(&LoginTemplate { error: None })
}

/// POST /login
/// Caches the acting user's email in the browser. Nothing is verified here;
/// the API is the authority on who may do what.
#[post("/login")]
pub async fn login(form: web::Form<LoginForm>) -> HttpResponse {
    let email = form.email.trim();
    if email.is_empty() {
        return render(&LoginTemplate {
            error: Some("Please enter your email"),
        });
    }

    let cookies = match sign_in_cookies(&StoredUser::with_email(email)) {
        Ok(cookies) => cookies,
        Err(e) => {
            error!("Failed to encode user blob: {}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    info!("Signed in as {}", email);
    let mut builder = see_other("/home");
    for cookie in cookies {
        builder.cookie(cookie);
    }
    builder.finish()
}

/// GET|POST /logout
/// Clears every identity key and sends the browser to the login page.
pub async fn logout() -> HttpResponse {
    let mut builder = see_other("/login");
    for cookie in sign_out_cookies() {
        builder.cookie(cookie);
    }
    builder.finish()
}
