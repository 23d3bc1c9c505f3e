use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::repo::{self, Document};
use crate::state::AppState;

pub struct UploadedFile {
    pub original_name: String,
    pub file_type: String,
    pub body: Bytes,
}

/// Stored name: millisecond timestamp plus the original extension.
/// Timestamps make concurrent uploads land in distinct slots.
fn storage_key(original_name: &str, now_ms: i128) -> String {
    let ext = std::path::Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{now_ms}{ext}")
}

pub async fn store_document(
    st: &AppState,
    student_id: Uuid,
    upload: UploadedFile,
) -> anyhow::Result<Document> {
    let now = OffsetDateTime::now_utc();
    let key = storage_key(&upload.original_name, now.unix_timestamp_nanos() / 1_000_000);

    st.storage
        .put_object(&key, upload.body)
        .await
        .with_context(|| format!("put_object {key}"))?;

    let file_path = format!("uploads/{key}");
    let doc = repo::insert(
        &st.db,
        student_id,
        &upload.original_name,
        &upload.file_type,
        &file_path,
    )
    .await?;
    Ok(doc)
}

/// Remove the metadata row and then the stored bytes. Missing rows are
/// a silent no-op; a failed sink delete is logged but does not fail the
/// request, since the metadata is already gone.
pub async fn remove_document(st: &AppState, id: Uuid) -> anyhow::Result<()> {
    let Some(doc) = repo::delete_by_id(&st.db, id).await? else {
        return Ok(());
    };
    let key = doc
        .file_path
        .strip_prefix("uploads/")
        .unwrap_or(&doc.file_path);
    if let Err(e) = st.storage.delete_object(key).await {
        warn!(error = %e, document_id = %id, key, "stored file cleanup failed");
    }
    Ok(())
}
