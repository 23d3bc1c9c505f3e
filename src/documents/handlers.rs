use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    documents::{
        dto::UploadResponse,
        repo::{self, Document},
        services::{self, UploadedFile},
    },
    dto::MessageResponse,
    error::AppError,
    policy::{self, Action},
    state::AppState,
};

pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents/upload", post(upload_document))
        .route("/documents/my-documents", get(my_documents))
        .route("/documents/:id", get(student_documents).delete(delete_document))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, user, mp), fields(user_id = %user.id))]
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    policy::authorize(&user, Action::UploadDocument)?;

    let mut file: Option<(String, bytes::Bytes)> = None;
    let mut file_type: Option<String> = None;

    while let Ok(Some(field)) = mp.next_field().await {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "upload".into());
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::Validation("Invalid multipart payload".into()))?;
                file = Some((original_name, data));
            }
            Some("fileType") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::Validation("Invalid multipart payload".into()))?;
                file_type = Some(value);
            }
            _ => {}
        }
    }

    let (original_name, body) = file.ok_or(AppError::NoFile)?;
    let file_type = file_type.ok_or_else(|| AppError::Validation("fileType is required".into()))?;

    let document = services::store_document(
        &state,
        user.id,
        UploadedFile {
            original_name,
            file_type,
            body,
        },
    )
    .await?;

    info!(document_id = %document.id, "document uploaded");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Document uploaded successfully".into(),
            document,
        }),
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn my_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Document>>, AppError> {
    let docs = repo::list_by_student(&state.db, user.id).await?;
    Ok(Json(docs))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn student_documents(
    State(state): State<AppState>,
    user: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Document>>, AppError> {
    policy::authorize(&user, Action::ViewDocuments { owner: student_id })?;
    let docs = repo::list_by_student(&state.db, student_id).await?;
    Ok(Json(docs))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    policy::authorize(&user, Action::DeleteDocument)?;
    // Idempotent: deleting an id that is already gone still succeeds.
    services::remove_document(&state, id).await?;
    info!(document_id = %id, "document deleted");
    Ok(Json(MessageResponse::new("Document deleted successfully")))
}
