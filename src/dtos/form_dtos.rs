//! Bodies and query strings posted by the browser to our own pages.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub confirm: Option<String>,
}

impl DeleteForm {
    pub fn is_confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub edit: Option<String>,
}

impl ProfileQuery {
    pub fn wants_edit(&self) -> bool {
        matches!(self.edit.as_deref(), Some("1") | Some("true"))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    /// `save` or `cancel`.
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
}
