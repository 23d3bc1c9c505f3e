use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{extractors::AuthUser, repo_types::User},
    clearances::{
        dto::{ClearanceResponse, UpdateDepartmentRequest, UpdateDepartmentResponse},
        repo,
        repo_types::{Department, DepartmentReview},
    },
    dto::Pagination,
    error::AppError,
    policy::{self, Action},
    state::AppState,
};

pub fn clearance_routes() -> Router<AppState> {
    Router::new()
        .route("/clearances/my-clearance", get(my_clearance))
        .route("/clearances", get(list_clearances))
        .route("/clearances/:student_id", get(get_clearance))
        .route("/clearances/:student_id/:department", put(update_department))
        // Equivalent route kept for client compatibility; same handler,
        // so the two paths cannot drift.
        .route(
            "/clearances/:student_id/departments/:department",
            post(update_department),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn my_clearance(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ClearanceResponse>, AppError> {
    let clearance = repo::get_by_student(&state.db, user.id)
        .await?
        .ok_or(AppError::NotFound("Clearance"))?;
    Ok(Json(ClearanceResponse::from_record(clearance, None)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_clearances(
    State(state): State<AppState>,
    user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ClearanceResponse>>, AppError> {
    policy::authorize(&user, Action::ViewAllClearances)?;
    let (limit, offset) = p.limit_offset();
    let rows = repo::list_with_students(&state.db, limit, offset).await?;
    let items = rows
        .into_iter()
        .map(|(clearance, student)| ClearanceResponse::from_record(clearance, Some(student)))
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_clearance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<Json<ClearanceResponse>, AppError> {
    policy::authorize(&user, Action::ViewClearance { owner: student_id })?;
    let (clearance, student) = repo::get_with_student(&state.db, student_id)
        .await?
        .ok_or(AppError::NotFound("Clearance"))?;
    Ok(Json(ClearanceResponse::from_record(clearance, Some(student))))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_department(
    State(state): State<AppState>,
    user: AuthUser,
    Path((student_id, department)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> Result<Json<UpdateDepartmentResponse>, AppError> {
    policy::authorize(&user, Action::UpdateClearance)?;

    let department: Department = department
        .parse()
        .map_err(|_| AppError::InvalidDepartment(department))?;

    // The stored approver is the reviewer's display name.
    let approver = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or(AppError::Unauthenticated("Unknown user"))?;

    let review = DepartmentReview {
        status: payload.status,
        comment: payload.comment,
        approved_by: Some(approver.name),
        approved_date: Some(OffsetDateTime::now_utc()),
    };

    // Single-statement write: only this department's key is replaced,
    // so a concurrent decision on another department is never lost.
    let updated = repo::set_department(&state.db, student_id, department, &review)
        .await?
        .ok_or(AppError::NotFound("Clearance"))?;
    info!(
        %student_id,
        department = department.as_str(),
        status = ?payload.status,
        overall = ?updated.status,
        "clearance updated"
    );

    Ok(Json(UpdateDepartmentResponse {
        message: "Clearance updated successfully".into(),
        clearance: ClearanceResponse::from_record(updated, None),
    }))
}
