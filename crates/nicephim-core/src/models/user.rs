use serde::{Deserialize, Serialize};
use validator::Validate;

/// Usernames that are treated as administrators even without the stored flag.
const ADMIN_USERNAMES: [&str; 2] = ["admin", "administrator"];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Option<LoginUser>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// User object inside a login response. Older backends send `user_id`, newer ones `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    #[serde(alias = "user_id")]
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: Option<String>,
}

/// The signed-in user as held by the client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "user_id")]
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.is_admin || self.has_admin_username()
    }

    pub fn has_admin_username(&self) -> bool {
        ADMIN_USERNAMES.contains(&self.username.as_str())
    }

    /// Name to greet the user with.
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

impl From<LoginUser> for User {
    fn from(user: LoginUser) -> Self {
        User {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            is_admin: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_user_accepts_user_id_alias() {
        let legacy: LoginUser = serde_json::from_str(
            r#"{"user_id":"u-1","username":"minh","email":"minh@example.com","display_name":"Minh"}"#,
        )
        .unwrap();
        assert_eq!(legacy.id, "u-1");

        let current: LoginUser =
            serde_json::from_str(r#"{"id":"u-2","username":"lan"}"#).unwrap();
        let user = User::from(current);
        assert_eq!(user.id, "u-2");
        assert!(!user.is_admin());
        assert_eq!(user.display_label(), "lan");
    }

    #[test]
    fn test_admin_detection() {
        let mut user = User {
            id: "1".to_string(),
            username: "administrator".to_string(),
            display_name: Some("Quản trị".to_string()),
            email: None,
            is_admin: false,
        };
        assert!(user.is_admin());
        assert_eq!(user.display_label(), "Quản trị");

        user.username = "viewer".to_string();
        assert!(!user.is_admin());
        user.is_admin = true;
        assert!(user.is_admin());
    }

    #[test]
    fn test_register_request_validation() {
        let mut req = RegisterRequest {
            username: "minh".to_string(),
            email: "minh@example.com".to_string(),
            password: "secret1".to_string(),
            display_name: None,
        };
        assert!(req.validate().is_ok());
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("displayName").is_none());

        req.password = "123".to_string();
        assert!(req.validate().is_err());

        req.password = "secret1".to_string();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }
}
