use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub email: String,
    pub name: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_a_password() {
        let response = PublicUser {
            email: "test@example.com".to_string(),
            name: "testuser".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("testuser"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn update_request_fields_default_to_absent() {
        let req: UpdateMeRequest = serde_json::from_str(r#"{"name": "newname"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("newname"));
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
