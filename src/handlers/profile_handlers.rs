// src/handlers/profile_handlers.rs
use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use chrono::Utc;

use super::{render, see_other};
use crate::dtos::form_dtos::{ProfileForm, ProfileQuery};
use crate::middleware::client_storage::{profile_saved_cookie, ClientStorage};
use crate::models::user::UserProfile;
use crate::services::profile_service::{ProfileManager, SaveOutcome};
use crate::AppState;

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate<'a> {
    profile: Option<&'a UserProfile>,
    draft: Option<&'a UserProfile>,
    error: Option<&'a str>,
    saved: bool,
    signed_in: bool,
}

fn page<'a>(manager: &'a ProfileManager, storage: &ClientStorage) -> ProfileTemplate<'a> {
    ProfileTemplate {
        profile: manager.profile(),
        draft: manager.draft(),
        error: manager.error(),
        saved: manager.success_visible(Utc::now()),
        signed_in: storage.email().is_some(),
    }
}

fn apply_form(draft: &mut UserProfile, form: ProfileForm) {
    draft.first_name = form.first_name;
    draft.last_name = form.last_name;
    draft.phone = form.phone;
    draft.age = form.age;
    draft.state = form.state;
    draft.address = form.address;
}

/// GET /profile
/// `?edit=1` opens the edit form on a copy of the loaded profile.
#[get("/profile")]
pub async fn show_profile(
    app_state: web::Data<AppState>,
    query: web::Query<ProfileQuery>,
    storage: ClientStorage,
) -> HttpResponse {
    let mut manager = ProfileManager::new(app_state.profiles.clone(), storage.email());
    manager.load().await;
    if let Some(at) = storage.profile_saved_at() {
        manager.restore_saved_at(at);
    }
    if query.wants_edit() {
        manager.begin_edit();
    }
    render(&page(&manager, &storage))
}

/// POST /profile
/// Saves the submitted draft, or discards it when `action=cancel`.
#[post("/profile")]
pub async fn save_profile(
    app_state: web::Data<AppState>,
    storage: ClientStorage,
    form: web::Form<ProfileForm>,
) -> HttpResponse {
    let form = form.into_inner();
    let mut manager = ProfileManager::new(app_state.profiles.clone(), storage.email());
    manager.load().await;
    manager.begin_edit();

    if form.action == "cancel" {
        manager.cancel_edit();
        return render(&page(&manager, &storage));
    }

    if let Some(draft) = manager.draft_mut() {
        apply_form(draft, form);
    }

    match manager.save().await {
        SaveOutcome::Saved => {
            let saved_at = manager.saved_at().unwrap_or_else(Utc::now);
            see_other("/profile")
                .cookie(profile_saved_cookie(saved_at))
                .finish()
        }
        SaveOutcome::Invalid(_)
        | SaveOutcome::SignedOut
        | SaveOutcome::NotEditing
        | SaveOutcome::Failed => render(&page(&manager, &storage)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    use super::*;
    use crate::handlers::test_support::{body_text, location, offline_state, signed_in_as, state};
    use crate::middleware::client_storage::PROFILE_SAVED_KEY;
    use crate::repositories::mock::{creator, ApiCall, InMemoryApi};

    async fn seeded() -> Arc<InMemoryApi> {
        let api = Arc::new(InMemoryApi::default());
        api.insert_profile(creator("meera@kala.in", "Meera", "Iyer"))
            .await;
        api
    }

    fn form(first: &str, last: &str, phone: &str) -> [(&'static str, String); 7] {
        [
            ("action", "save".to_string()),
            ("first_name", first.to_string()),
            ("last_name", last.to_string()),
            ("phone", phone.to_string()),
            ("age", "34".to_string()),
            ("state", "Tamil Nadu".to_string()),
            ("address", "Mylapore".to_string()),
        ]
    }

    #[actix_web::test]
    async fn edit_mode_shows_the_form() {
        let app = test::init_service(
            App::new().app_data(state(seeded().await)).service(show_profile),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/profile?edit=1")
            .cookie(signed_in_as("meera@kala.in"))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains(r#"name="first_name" value="Meera""#));
        assert!(body.contains("Save Changes"));
    }

    #[actix_web::test]
    async fn signed_out_profile_asks_to_sign_in() {
        let api = seeded().await;
        let app = test::init_service(
            App::new().app_data(state(api.clone())).service(show_profile),
        )
        .await;
        let req = test::TestRequest::get().uri("/profile").to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Please sign in to view your profile."));
        assert!(api.calls().await.is_empty());
    }

    #[actix_web::test]
    async fn invalid_phone_is_rejected_inline() {
        let api = seeded().await;
        let app = test::init_service(
            App::new().app_data(state(api.clone())).service(save_profile),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/profile")
            .cookie(signed_in_as("meera@kala.in"))
            .set_form(form("Meera", "Iyer", "abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("Please enter a valid phone number"));
        assert!(body.contains("Save Changes"));
        assert_eq!(api.count(|c| matches!(c, ApiCall::UpdateProfile(..))).await, 0);
    }

    #[actix_web::test]
    async fn empty_name_is_rejected_inline() {
        let api = seeded().await;
        let app = test::init_service(
            App::new().app_data(state(api.clone())).service(save_profile),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/profile")
            .cookie(signed_in_as("meera@kala.in"))
            .set_form(form("", "Iyer", ""))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("First name and last name are required"));
        assert_eq!(api.count(|c| matches!(c, ApiCall::UpdateProfile(..))).await, 0);
    }

    #[actix_web::test]
    async fn valid_save_redirects_with_flash() {
        let api = seeded().await;
        let app = test::init_service(
            App::new()
                .app_data(state(api.clone()))
                .service(show_profile)
                .service(save_profile),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/profile")
            .cookie(signed_in_as("meera@kala.in"))
            .set_form(form("Meera", "Iyer", "+919876543210"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp).as_deref(), Some("/profile"));
        let flash = resp
            .response()
            .cookies()
            .find(|c| c.name() == PROFILE_SAVED_KEY)
            .map(|c| c.into_owned())
            .expect("flash cookie");

        let stored = api.profile("meera@kala.in").await.unwrap();
        assert_eq!(stored.state, "Tamil Nadu");
        assert_eq!(stored.phone, "+919876543210");

        let req = test::TestRequest::get()
            .uri("/profile")
            .cookie(signed_in_as("meera@kala.in"))
            .cookie(flash)
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Profile updated successfully!"));
        assert!(body.contains("Mylapore"));
    }

    #[actix_web::test]
    async fn cancel_discards_the_draft() {
        let api = seeded().await;
        let app = test::init_service(
            App::new().app_data(state(api.clone())).service(save_profile),
        )
        .await;
        let mut fields = form("Changed", "Name", "");
        fields[0].1 = "cancel".to_string();
        let req = test::TestRequest::post()
            .uri("/profile")
            .cookie(signed_in_as("meera@kala.in"))
            .set_form(fields)
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Meera Iyer"));
        assert!(!body.contains("Changed"));
        assert_eq!(api.count(|c| matches!(c, ApiCall::UpdateProfile(..))).await, 0);
    }

    #[actix_web::test]
    async fn offline_profile_never_calls_the_api() {
        let api = Arc::new(InMemoryApi::default());
        let app = test::init_service(
            App::new()
                .app_data(offline_state(api.clone()))
                .service(show_profile)
                .service(save_profile),
        )
        .await;
        let req = test::TestRequest::get().uri("/profile").to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Arjun Sharma"));

        let req = test::TestRequest::post()
            .uri("/profile")
            .set_form(form("Arjun", "Rao", ""))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(api.calls().await.is_empty());
    }
}
