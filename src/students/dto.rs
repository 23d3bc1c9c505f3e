use serde::{Deserialize, Serialize};

use crate::auth::dto::PublicUser;

/// Request body for a staff/admin adding a student. Same profile shape
/// as registration, but the role is always student.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub roll_no: Option<String>,
    pub course: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddStudentResponse {
    pub message: String,
    pub student: PublicUser,
}
