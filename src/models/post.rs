use serde::{Deserialize, Serialize};

use super::user::Creator;
use super::{lenient_string, null_as_default};

/// A post as the remote API stores it. Server-owned: the frontend only reads
/// it and mutates it through like/comment/delete calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: Creator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
}

impl Post {
    /// First image, used as the card/detail thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Public URL of the thumbnail under the API's `uploads/` directory.
    pub fn thumbnail_url(&self, api_base: &str) -> Option<String> {
        self.thumbnail().map(|path| upload_url(api_base, path))
    }

    pub fn is_created_by(&self, email: &str) -> bool {
        !email.is_empty() && self.creator.email == email
    }
}

/// Stored image paths come back as server-side paths (`uploads/abc.png`,
/// `/srv/app/uploads/abc.png`); only the file name is public.
pub fn upload_url(api_base: &str, path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    format!("{}/uploads/{}", api_base.trim_end_matches('/'), file_name)
}
