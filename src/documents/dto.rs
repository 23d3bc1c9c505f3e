use serde::Serialize;

use super::repo::Document;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub document: Document,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn document_serializes_camel_case() {
        let doc = Document {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            file_name: "marksheet.pdf".into(),
            file_type: "marksheet".into(),
            file_path: "uploads/1700000000000.pdf".into(),
            upload_date: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(UploadResponse {
            message: "Document uploaded successfully".into(),
            document: doc,
        })
        .unwrap();
        assert_eq!(json["document"]["fileName"], "marksheet.pdf");
        assert_eq!(json["document"]["fileType"], "marksheet");
        assert_eq!(json["document"]["filePath"], "uploads/1700000000000.pdf");
        assert!(json["document"]["uploadDate"].is_string());
    }
}
