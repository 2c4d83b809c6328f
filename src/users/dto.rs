use serde::Deserialize;
use serde_json::Value;

use super::repo_types::NewUser;

/// Request body for user creation. Fields are optional so that a missing
/// field is reported as invalid input rather than a parse failure.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl CreateUserRequest {
    /// Only a JSON object can carry the fields; anything else is rejected.
    pub fn from_json(body: Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        serde_json::from_value(body).ok()
    }

    /// Both fields present and non-empty, or `None`.
    pub fn into_new_user(self) -> Option<NewUser> {
        match (self.username, self.email) {
            (Some(username), Some(email)) if !username.is_empty() && !email.is_empty() => {
                Some(NewUser { username, email })
            }
            _ => None,
        }
    }
}
