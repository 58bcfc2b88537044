use serde::{Deserialize, Serialize};

use crate::models::user::UserProfile;

#[derive(Debug, Serialize)]
pub struct ProfileLookup<'a> {
    pub email: &'a str,
}

/// Reply of `POST /get_profile`.
#[derive(Debug, Deserialize)]
pub struct ProfileEnvelope {
    pub user: Option<UserProfile>,
    pub error: Option<String>,
}

/// Body of `POST /update_profile`: the key email plus the editable fields.
#[derive(Debug, Serialize)]
pub struct ProfileUpdate<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub age: &'a str,
    pub state: &'a str,
    pub address: &'a str,
}

impl<'a> ProfileUpdate<'a> {
    pub fn new(email: &'a str, profile: &'a UserProfile) -> Self {
        Self {
            email,
            first_name: &profile.first_name,
            last_name: &profile.last_name,
            phone: &profile.phone,
            age: &profile.age,
            state: &profile.state,
            address: &profile.address,
        }
    }
}

/// Reply of `POST /update_profile`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAck {
    pub error: Option<String>,
}
