use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::PublicUser,
        extractors::AuthUser,
        handlers::is_valid_email,
        password::hash_password,
        repo_types::{NewUser, Role, User},
    },
    clearances,
    dto::Pagination,
    error::AppError,
    policy::{self, Action},
    state::AppState,
    students::{
        dto::{AddStudentRequest, AddStudentResponse},
        repo,
    },
};

pub fn student_routes() -> Router<AppState> {
    Router::new().route("/students", get(list_students).post(add_student))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_students(
    State(state): State<AppState>,
    user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    policy::authorize(&user, Action::ListStudents)?;
    let (limit, offset) = p.limit_offset();
    let students = repo::list_students(&state.db, limit, offset).await?;
    Ok(Json(students.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn add_student(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut payload): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<AddStudentResponse>), AppError> {
    policy::authorize(&user, Action::AddStudent)?;

    payload.email = payload.email.trim().to_lowercase();
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "student already exists");
        return Err(AppError::Conflict("Student already exists"));
    }

    let hash = hash_password(&payload.password)?;

    let mut tx = state.db.begin().await?;
    let student = User::create_tx(
        &mut tx,
        NewUser {
            email: &payload.email,
            password_hash: &hash,
            role: Role::Student,
            name: &payload.name,
            roll_no: payload.roll_no.as_deref(),
            course: payload.course.as_deref(),
            year: payload.year.as_deref(),
            department: payload.department.as_deref(),
        },
    )
    .await?;
    clearances::repo::create_tx(&mut tx, student.id).await?;
    tx.commit().await?;

    info!(student_id = %student.id, added_by = %user.id, "student added");
    Ok((
        StatusCode::CREATED,
        Json(AddStudentResponse {
            message: "Student added successfully".into(),
            student: student.into(),
        }),
    ))
}
