use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Document metadata row. The bytes themselves live in the storage sink
/// under `file_path`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub student_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub upload_date: OffsetDateTime,
}

const DOCUMENT_COLUMNS: &str = "id, student_id, file_name, file_type, file_path, upload_date";

pub async fn insert(
    db: &PgPool,
    student_id: Uuid,
    file_name: &str,
    file_type: &str,
    file_path: &str,
) -> anyhow::Result<Document> {
    let row = sqlx::query_as::<_, Document>(&format!(
        r#"
        INSERT INTO documents (student_id, file_name, file_type, file_path)
        VALUES ($1, $2, $3, $4)
        RETURNING {DOCUMENT_COLUMNS}
        "#
    ))
    .bind(student_id)
    .bind(file_name)
    .bind(file_type)
    .bind(file_path)
    .fetch_one(db)
    .await
    .context("insert document")?;
    Ok(row)
}

pub async fn list_by_student(db: &PgPool, student_id: Uuid) -> anyhow::Result<Vec<Document>> {
    let rows = sqlx::query_as::<_, Document>(&format!(
        r#"
        SELECT {DOCUMENT_COLUMNS}
        FROM documents
        WHERE student_id = $1
        ORDER BY upload_date ASC
        "#
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
    .context("list documents by student")?;
    Ok(rows)
}

/// Delete the row and return it so the caller can clean up the stored
/// bytes. `None` means the id was already gone.
pub async fn delete_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Document>> {
    let row = sqlx::query_as::<_, Document>(&format!(
        "DELETE FROM documents WHERE id = $1 RETURNING {DOCUMENT_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("delete document")?;
    Ok(row)
}
