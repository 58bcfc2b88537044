use mime::Mime;
use serde::{Deserialize, Serialize};

/// Body of `POST /add_comment/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentIn {
    pub author: String,
    pub text: String,
}

/// Reply of `POST /create_post`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreatePostResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// One selected file, held in memory until the multipart submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Mime,
    pub data: Vec<u8>,
}

/// Everything `POST /create_post` sends. Tags stay the raw comma-separated
/// string the user typed; the API splits them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostSubmission {
    pub email: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub images: Vec<ImageUpload>,
}
