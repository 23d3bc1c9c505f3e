use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// The six review domains. A closed set: an unknown key in a request
/// fails parsing before any data is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Library,
    Hostel,
    Accounts,
    Lab,
    Department,
    Placement,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Library,
        Department::Hostel,
        Department::Accounts,
        Department::Lab,
        Department::Department,
        Department::Placement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Library => "library",
            Department::Hostel => "hostel",
            Department::Accounts => "accounts",
            Department::Lab => "lab",
            Department::Department => "department",
            Department::Placement => "placement",
        }
    }
}

impl FromStr for Department {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "library" => Ok(Department::Library),
            "hostel" => Ok(Department::Hostel),
            "accounts" => Ok(Department::Accounts),
            "lab" => Ok(Department::Lab),
            "department" => Ok(Department::Department),
            "placement" => Ok(Department::Placement),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentStatus {
    Pending,
    Approved,
    Rejected,
}

/// One department's decision on a clearance. Updated as a whole: a new
/// decision replaces status, comment, approver and timestamp together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentReview {
    pub status: DepartmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub approved_date: Option<OffsetDateTime>,
}

impl Default for DepartmentReview {
    fn default() -> Self {
        Self {
            status: DepartmentStatus::Pending,
            comment: None,
            approved_by: None,
            approved_date: None,
        }
    }
}

/// Per-department sub-records, one named field per key. Stored as a
/// single jsonb value on the clearance row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Departments {
    #[serde(default)]
    pub library: DepartmentReview,
    #[serde(default)]
    pub hostel: DepartmentReview,
    #[serde(default)]
    pub accounts: DepartmentReview,
    #[serde(default)]
    pub lab: DepartmentReview,
    #[serde(default)]
    pub department: DepartmentReview,
    #[serde(default)]
    pub placement: DepartmentReview,
}

impl Departments {
    pub fn review(&self, d: Department) -> &DepartmentReview {
        match d {
            Department::Library => &self.library,
            Department::Hostel => &self.hostel,
            Department::Accounts => &self.accounts,
            Department::Lab => &self.lab,
            Department::Department => &self.department,
            Department::Placement => &self.placement,
        }
    }

    pub fn review_mut(&mut self, d: Department) -> &mut DepartmentReview {
        match d {
            Department::Library => &mut self.library,
            Department::Hostel => &mut self.hostel,
            Department::Accounts => &mut self.accounts,
            Department::Lab => &mut self.lab,
            Department::Department => &mut self.department,
            Department::Placement => &mut self.placement,
        }
    }

    pub fn all_approved(&self) -> bool {
        Department::ALL
            .iter()
            .all(|d| self.review(*d).status == DepartmentStatus::Approved)
    }

    /// Derived overall status, recomputed in full on every update. A
    /// rejection after completion reverts the clearance to pending.
    pub fn overall_status(&self) -> ClearanceStatus {
        if self.all_approved() {
            ClearanceStatus::Completed
        } else {
            ClearanceStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "clearance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClearanceStatus {
    Pending,
    Completed,
}

/// Clearance record in the database, one per student.
#[derive(Debug, Clone, FromRow)]
pub struct Clearance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub status: ClearanceStatus,
    pub submitted_date: OffsetDateTime,
    pub departments: sqlx::types::Json<Departments>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approve(d: &mut Departments, key: Department) {
        *d.review_mut(key) = DepartmentReview {
            status: DepartmentStatus::Approved,
            comment: None,
            approved_by: Some("Staff Member".into()),
            approved_date: Some(OffsetDateTime::now_utc()),
        };
    }

    #[test]
    fn unknown_department_key_is_rejected() {
        assert!("finance".parse::<Department>().is_err());
        assert!("Library".parse::<Department>().is_err());
        assert!("".parse::<Department>().is_err());
    }

    #[test]
    fn every_key_parses_back_from_its_string() {
        for d in Department::ALL {
            assert_eq!(d.as_str().parse::<Department>(), Ok(d));
        }
    }

    #[test]
    fn new_record_starts_all_pending() {
        let d = Departments::default();
        for key in Department::ALL {
            assert_eq!(d.review(key).status, DepartmentStatus::Pending);
        }
        assert_eq!(d.overall_status(), ClearanceStatus::Pending);
    }

    #[test]
    fn five_approvals_leave_status_pending() {
        let mut d = Departments::default();
        for key in &Department::ALL[..5] {
            approve(&mut d, *key);
        }
        assert!(!d.all_approved());
        assert_eq!(d.overall_status(), ClearanceStatus::Pending);
    }

    #[test]
    fn six_approvals_complete_the_clearance() {
        let mut d = Departments::default();
        for key in Department::ALL {
            approve(&mut d, key);
        }
        assert!(d.all_approved());
        assert_eq!(d.overall_status(), ClearanceStatus::Completed);
    }

    #[test]
    fn rejection_after_completion_reverts_to_pending() {
        let mut d = Departments::default();
        for key in Department::ALL {
            approve(&mut d, key);
        }
        assert_eq!(d.overall_status(), ClearanceStatus::Completed);

        d.review_mut(Department::Hostel).status = DepartmentStatus::Rejected;
        assert_eq!(d.overall_status(), ClearanceStatus::Pending);
    }

    #[test]
    fn update_replaces_the_whole_sub_record() {
        let mut d = Departments::default();
        *d.review_mut(Department::Library) = DepartmentReview {
            status: DepartmentStatus::Approved,
            comment: Some("ok".into()),
            approved_by: Some("Alice".into()),
            approved_date: Some(OffsetDateTime::now_utc()),
        };
        // A later decision without a comment discards the earlier one.
        *d.review_mut(Department::Library) = DepartmentReview {
            status: DepartmentStatus::Rejected,
            comment: None,
            approved_by: Some("Bob".into()),
            approved_date: Some(OffsetDateTime::now_utc()),
        };
        let review = d.review(Department::Library);
        assert_eq!(review.status, DepartmentStatus::Rejected);
        assert!(review.comment.is_none());
        assert_eq!(review.approved_by.as_deref(), Some("Bob"));
    }

    #[test]
    fn single_key_replacement_keeps_other_decisions() {
        // Mirror of the jsonb_set write path: two reviewers replace
        // different keys of the same stored object; neither decision
        // may clobber the other.
        let mut stored = serde_json::to_value(Departments::default()).unwrap();

        let library = DepartmentReview {
            status: DepartmentStatus::Approved,
            comment: Some("ok".into()),
            approved_by: Some("Alice".into()),
            approved_date: Some(OffsetDateTime::now_utc()),
        };
        let hostel = DepartmentReview {
            status: DepartmentStatus::Approved,
            comment: None,
            approved_by: Some("Bob".into()),
            approved_date: Some(OffsetDateTime::now_utc()),
        };
        stored["library"] = serde_json::to_value(&library).unwrap();
        stored["hostel"] = serde_json::to_value(&hostel).unwrap();

        let merged: Departments = serde_json::from_value(stored).unwrap();
        assert_eq!(merged.library, library);
        assert_eq!(merged.hostel, hostel);
        assert_eq!(merged.accounts.status, DepartmentStatus::Pending);
        assert_eq!(merged.overall_status(), ClearanceStatus::Pending);
    }

    #[test]
    fn json_shape_matches_the_wire_format() {
        let mut d = Departments::default();
        approve(&mut d, Department::Library);
        d.library.comment = Some("ok".into());

        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["library"]["status"], "approved");
        assert_eq!(json["library"]["comment"], "ok");
        assert_eq!(json["library"]["approvedBy"], "Staff Member");
        assert!(json["library"]["approvedDate"].is_string());
        assert_eq!(json["hostel"]["status"], "pending");
        assert!(json["hostel"].get("approvedBy").is_none());

        let back: Departments = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn partial_json_fills_missing_departments_with_pending() {
        let back: Departments =
            serde_json::from_str(r#"{"library": {"status": "approved"}}"#).unwrap();
        assert_eq!(back.library.status, DepartmentStatus::Approved);
        assert_eq!(back.placement.status, DepartmentStatus::Pending);
    }
}
