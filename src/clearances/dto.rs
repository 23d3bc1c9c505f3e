use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::clearances::repo_types::{Clearance, ClearanceStatus, Departments, DepartmentStatus};

/// Student fields joined onto clearance listings, mirroring what the
/// dashboard shows next to each record.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub status: ClearanceStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_date: OffsetDateTime,
    pub departments: Departments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentSummary>,
}

impl ClearanceResponse {
    pub fn from_record(c: Clearance, student: Option<StudentSummary>) -> Self {
        Self {
            id: c.id,
            student_id: c.student_id,
            status: c.status,
            submitted_date: c.submitted_date,
            departments: c.departments.0,
            student,
        }
    }
}

/// Body of a department decision. The sub-record is overwritten whole;
/// an omitted comment clears any previous one.
#[derive(Debug, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub status: DepartmentStatus,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateDepartmentResponse {
    pub message: String,
    pub clearance: ClearanceResponse,
}
