use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub roll_no: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client. The password hash
/// never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            role: u.role,
            name: u.name,
            roll_no: u.roll_no,
            course: u.course,
            year: u.year,
            department: u.department,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_omits_absent_profile_fields() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "a@b.edu".into(),
            role: Role::Student,
            name: "A".into(),
            roll_no: Some("R1".into()),
            course: None,
            year: None,
            department: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["rollNo"], "R1");
        assert_eq!(json["role"], "student");
        assert!(json.get("course").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn register_request_accepts_camel_case_profile() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.edu","password":"pw123456","role":"student",
                "name":"A","rollNo":"R1","course":"CS","year":"3"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Student);
        assert_eq!(req.roll_no.as_deref(), Some("R1"));
        assert!(req.department.is_none());
    }
}
