// src/middleware/client_storage.rs
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::Cookie;
use actix_web::{dev::Payload, Error, FromRequest, HttpRequest};
use base64::Engine;
use chrono::{DateTime, Utc};
use futures::future::{ready, Ready};
use log::warn;

use crate::models::user::StoredUser;
use crate::services::profile_service::SUCCESS_VISIBLE_SECS;

pub const USER_KEY: &str = "user";
pub const USER_ID_KEY: &str = "user_id";
pub const USER_EMAIL_KEY: &str = "user_email";
pub const IS_LOGGED_IN_KEY: &str = "is_logged_in";
pub const GOOGLE_USER_KEY: &str = "google_user";
pub const LIKED_POSTS_KEY: &str = "liked_posts";
pub const PROFILE_SAVED_KEY: &str = "profile_saved";

/// Keys removed on sign-out.
const IDENTITY_KEYS: [&str; 5] = [
    USER_KEY,
    USER_ID_KEY,
    USER_EMAIL_KEY,
    IS_LOGGED_IN_KEY,
    GOOGLE_USER_KEY,
];

/// What this browser keeps between page loads. Read fresh on every request;
/// it is a convenience cache, not proof of identity.
#[derive(Debug, Default)]
pub struct ClientStorage {
    user: Option<StoredUser>,
    liked_posts: Vec<String>,
    profile_saved_at: Option<DateTime<Utc>>,
}

impl FromRequest for ClientStorage {
    type Error = Error;
    type Future = Ready<Result<ClientStorage, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(ClientStorage::read(req)))
    }
}

impl ClientStorage {
    pub fn read(req: &HttpRequest) -> Self {
        let user = req
            .cookie(USER_KEY)
            .and_then(|c| decode_user(c.value()));

        let liked_posts = req
            .cookie(LIKED_POSTS_KEY)
            .map(|c| decode_liked(c.value()))
            .unwrap_or_default();

        let profile_saved_at = req
            .cookie(PROFILE_SAVED_KEY)
            .and_then(|c| c.value().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);

        Self {
            user,
            liked_posts,
            profile_saved_at,
        }
    }

    /// The acting user's email, from the cached `user` blob.
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(StoredUser::email)
    }

    pub fn has_liked(&self, post_id: &str) -> bool {
        self.liked_posts.iter().any(|id| id == post_id)
    }

    /// The liked-posts cookie with `post_id` added.
    pub fn liked_cookie(&self, post_id: &str) -> Cookie<'static> {
        let mut ids = self.liked_posts.clone();
        if !ids.iter().any(|id| id == post_id) {
            ids.push(post_id.to_string());
        }
        let value = ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        Cookie::build(LIKED_POSTS_KEY, value).path("/").finish()
    }

    pub fn profile_saved_at(&self) -> Option<DateTime<Utc>> {
        self.profile_saved_at
    }
}

pub fn encode_user(user: &StoredUser) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(user)?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json))
}

/// A blob that does not decode is treated as absent.
pub fn decode_user(value: &str) -> Option<StoredUser> {
    let bytes = match base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Ignoring undecodable user blob: {}", e);
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Error parsing user data: {}", e);
            None
        }
    }
}

fn decode_liked(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| urlencoding::decode(s).ok().map(|id| id.into_owned()))
        .collect()
}

/// Cookies written when a user signs in.
pub fn sign_in_cookies(user: &StoredUser) -> Result<Vec<Cookie<'static>>, serde_json::Error> {
    let mut cookies = vec![
        Cookie::build(USER_KEY, encode_user(user)?).path("/").finish(),
        Cookie::build(IS_LOGGED_IN_KEY, "true").path("/").finish(),
    ];
    if let Some(email) = user.email() {
        cookies.push(
            Cookie::build(USER_EMAIL_KEY, urlencoding::encode(email).into_owned())
                .path("/")
                .finish(),
        );
    }
    Ok(cookies)
}

/// Removal cookies for every identity key.
pub fn sign_out_cookies() -> Vec<Cookie<'static>> {
    IDENTITY_KEYS
        .iter()
        .map(|key| {
            let mut cookie = Cookie::build(*key, "").path("/").finish();
            cookie.make_removal();
            cookie
        })
        .collect()
}

/// Flash cookie that keeps the profile "saved" indicator alive across the
/// redirect, and expires with it.
pub fn profile_saved_cookie(at: DateTime<Utc>) -> Cookie<'static> {
    Cookie::build(PROFILE_SAVED_KEY, at.timestamp_millis().to_string())
        .path("/")
        .max_age(CookieDuration::seconds(SUCCESS_VISIBLE_SECS))
        .finish()
}
