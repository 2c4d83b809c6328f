use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
///
/// Serializes to `{id, username, email}` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64, // assigned by storage
    pub username: String,
    pub email: String,
}

/// Insert payload for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_plain_mapping() {
        let user = User {
            id: 7,
            username: "alice".into(),
            email: "a@x.com".into(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"id":7,"username":"alice","email":"a@x.com"}"#);
    }

    #[test]
    fn constraint_error_displays_its_message() {
        let err = RepoError::Constraint("NOT NULL constraint failed: users.email".into());
        assert_eq!(err.to_string(), "NOT NULL constraint failed: users.email");
    }
}
