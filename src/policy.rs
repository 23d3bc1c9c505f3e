use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::auth::repo_types::Role;
use crate::error::AppError;

/// Everything a handler may want to do, named up front so the role rules
/// live in exactly one place instead of drifting between routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListStudents,
    AddStudent,
    ViewClearance { owner: Uuid },
    ViewAllClearances,
    UpdateClearance,
    ViewStats,
    ViewDocuments { owner: Uuid },
    UploadDocument,
    DeleteDocument,
}

/// Pure decision function, evaluated before any data access.
pub fn authorize(identity: &AuthUser, action: Action) -> Result<(), AppError> {
    let allowed = match action {
        Action::ListStudents | Action::AddStudent | Action::UpdateClearance => {
            matches!(identity.role, Role::Staff | Role::Admin)
        }
        Action::ViewAllClearances | Action::ViewStats => identity.role == Role::Admin,
        Action::ViewClearance { owner } | Action::ViewDocuments { owner } => {
            matches!(identity.role, Role::Staff | Role::Admin) || identity.id == owner
        }
        Action::UploadDocument | Action::DeleteDocument => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "someone@example.edu".into(),
            role,
        }
    }

    #[test]
    fn staff_and_admin_manage_students_and_clearances() {
        for role in [Role::Staff, Role::Admin] {
            let user = identity(role);
            assert!(authorize(&user, Action::ListStudents).is_ok());
            assert!(authorize(&user, Action::AddStudent).is_ok());
            assert!(authorize(&user, Action::UpdateClearance).is_ok());
        }
        let student = identity(Role::Student);
        assert!(authorize(&student, Action::ListStudents).is_err());
        assert!(authorize(&student, Action::AddStudent).is_err());
        assert!(authorize(&student, Action::UpdateClearance).is_err());
    }

    #[test]
    fn only_admin_sees_all_clearances_and_stats() {
        assert!(authorize(&identity(Role::Admin), Action::ViewAllClearances).is_ok());
        assert!(authorize(&identity(Role::Admin), Action::ViewStats).is_ok());
        for role in [Role::Student, Role::Staff] {
            let user = identity(role);
            assert!(authorize(&user, Action::ViewAllClearances).is_err());
            assert!(authorize(&user, Action::ViewStats).is_err());
        }
    }

    #[test]
    fn student_views_own_clearance_but_not_others() {
        let student = identity(Role::Student);
        assert!(authorize(&student, Action::ViewClearance { owner: student.id }).is_ok());
        assert!(authorize(&student, Action::ViewClearance { owner: Uuid::new_v4() }).is_err());
    }

    #[test]
    fn staff_views_any_clearance_and_documents() {
        let staff = identity(Role::Staff);
        assert!(authorize(&staff, Action::ViewClearance { owner: Uuid::new_v4() }).is_ok());
        assert!(authorize(&staff, Action::ViewDocuments { owner: Uuid::new_v4() }).is_ok());
    }

    #[test]
    fn documents_ownership_mirrors_clearances() {
        let student = identity(Role::Student);
        assert!(authorize(&student, Action::ViewDocuments { owner: student.id }).is_ok());
        assert!(authorize(&student, Action::ViewDocuments { owner: Uuid::new_v4() }).is_err());
    }

    #[test]
    fn any_authenticated_user_uploads_and_deletes() {
        for role in [Role::Student, Role::Staff, Role::Admin] {
            let user = identity(role);
            assert!(authorize(&user, Action::UploadDocument).is_ok());
            assert!(authorize(&user, Action::DeleteDocument).is_ok());
        }
    }
}
