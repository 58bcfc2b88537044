// src/main.rs
mod config;
mod dtos;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use reqwest::Client;

use crate::config::{AppConfig, ProfileMode};
use crate::handlers::feed_handlers::home;
use crate::handlers::landing_handlers::landing;
use crate::handlers::post_handlers::{compose_form, create_post};
use crate::handlers::profile_handlers::{save_profile, show_profile};
use crate::handlers::session_handlers::{login, login_form, logout};
use crate::handlers::viewpost_handlers::{
    comment_post, confirm_delete, delete_post, like_post, view_post,
};
use crate::repositories::kalarasa_repo::KalarasaApi;
use crate::repositories::ArtApi;
use crate::services::profile_service::{OfflineProfile, ProfileSource};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ArtApi>,
    pub profiles: ProfileSource,
    /// Base URL of the remote API, used to build image URLs.
    pub api_base: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Kalarasa API: {}", config.api_base);

    let http_client = match Client::builder().user_agent("kalarasa-web/0.1").build() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build http client: {}", e);
            std::process::exit(1);
        }
    };

    let api: Arc<dyn ArtApi> = Arc::new(KalarasaApi::new(http_client, &config.api_base));
    let profiles = match config.profile_mode {
        ProfileMode::Live => ProfileSource::Live(api.clone()),
        ProfileMode::Offline => {
            info!(
                "Profile page uses offline data ({} ms delay)",
                config.offline_profile_delay.as_millis()
            );
            ProfileSource::Offline(OfflineProfile::new(config.offline_profile_delay))
        }
    };

    let state = web::Data::new(AppState {
        api,
        profiles,
        api_base: config.api_base.clone(),
    });

    let bind_address = config.bind_address();
    let allowed_origins = config.allowed_origins.clone();
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["content-type", "accept"])
            .supports_credentials()
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .service(landing)
            .service(home)
            .service(compose_form)
            .service(create_post)
            .service(view_post)
            .service(like_post)
            .service(comment_post)
            .service(confirm_delete)
            .service(delete_post)
            .service(show_profile)
            .service(save_profile)
            .service(login_form)
            .service(login)
            .route("/logout", web::get().to(logout))
            .route("/logout", web::post().to(logout))
    })
    .bind(&bind_address)?
    .run()
    .await
}
