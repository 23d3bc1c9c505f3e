use anyhow::Context;
use sqlx::{types::Json, FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::clearances::dto::StudentSummary;
use crate::clearances::repo_types::{
    Clearance, ClearanceStatus, Department, DepartmentReview, Departments,
};

const CLEARANCE_COLUMNS: &str = "id, student_id, status, submitted_date, departments";

/// Insert the empty clearance record paired with a new student, inside
/// the same transaction as the user insert.
pub async fn create_tx(tx: &mut Transaction<'_, Postgres>, student_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO clearances (student_id, departments) VALUES ($1, $2)")
        .bind(student_id)
        .bind(Json(Departments::default()))
        .execute(&mut **tx)
        .await
        .context("insert clearance")?;
    Ok(())
}

pub async fn get_by_student(db: &PgPool, student_id: Uuid) -> anyhow::Result<Option<Clearance>> {
    let row = sqlx::query_as::<_, Clearance>(&format!(
        "SELECT {CLEARANCE_COLUMNS} FROM clearances WHERE student_id = $1"
    ))
    .bind(student_id)
    .fetch_optional(db)
    .await
    .context("get clearance by student")?;
    Ok(row)
}

#[derive(Debug, FromRow)]
struct ClearanceStudentRow {
    id: Uuid,
    student_id: Uuid,
    status: ClearanceStatus,
    submitted_date: OffsetDateTime,
    departments: Json<Departments>,
    name: String,
    roll_no: Option<String>,
    course: Option<String>,
    year: Option<String>,
    email: String,
}

impl ClearanceStudentRow {
    fn split(self) -> (Clearance, StudentSummary) {
        let student = StudentSummary {
            id: self.student_id,
            name: self.name,
            roll_no: self.roll_no,
            course: self.course,
            year: self.year,
            email: self.email,
        };
        let clearance = Clearance {
            id: self.id,
            student_id: self.student_id,
            status: self.status,
            submitted_date: self.submitted_date,
            departments: self.departments,
        };
        (clearance, student)
    }
}

/// List clearances with their student summary, insertion order.
pub async fn list_with_students(
    db: &PgPool,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<(Clearance, StudentSummary)>> {
    let rows = sqlx::query_as::<_, ClearanceStudentRow>(
        r#"
        SELECT c.id, c.student_id, c.status, c.submitted_date, c.departments,
               u.name, u.roll_no, u.course, u.year, u.email
        FROM clearances c
        JOIN users u ON u.id = c.student_id
        ORDER BY c.submitted_date ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list clearances")?;
    Ok(rows.into_iter().map(ClearanceStudentRow::split).collect())
}

pub async fn get_with_student(
    db: &PgPool,
    student_id: Uuid,
) -> anyhow::Result<Option<(Clearance, StudentSummary)>> {
    let row = sqlx::query_as::<_, ClearanceStudentRow>(
        r#"
        SELECT c.id, c.student_id, c.status, c.submitted_date, c.departments,
               u.name, u.roll_no, u.course, u.year, u.email
        FROM clearances c
        JOIN users u ON u.id = c.student_id
        WHERE c.student_id = $1
        "#,
    )
    .bind(student_id)
    .fetch_optional(db)
    .await
    .context("get clearance with student")?;
    Ok(row.map(ClearanceStudentRow::split))
}

/// Overwrite one department's sub-record and recompute the overall
/// status, all in a single row write. `jsonb_set` touches only the one
/// key, so concurrent decisions on different departments both survive;
/// concurrent writes to the same key stay last-write-wins. Returns
/// `None` when the student has no clearance record.
pub async fn set_department(
    db: &PgPool,
    student_id: Uuid,
    department: Department,
    review: &DepartmentReview,
) -> anyhow::Result<Option<Clearance>> {
    let row = sqlx::query_as::<_, Clearance>(&format!(
        r#"
        UPDATE clearances
        SET departments = jsonb_set(departments, $1, $2),
            status = CASE WHEN (
                SELECT bool_and(value ->> 'status' = 'approved')
                FROM jsonb_each(jsonb_set(departments, $1, $2))
            ) THEN 'completed'::clearance_status
              ELSE 'pending'::clearance_status
            END
        WHERE student_id = $3
        RETURNING {CLEARANCE_COLUMNS}
        "#
    ))
    .bind(vec![department.as_str()])
    .bind(Json(review.clone()))
    .bind(student_id)
    .fetch_optional(db)
    .await
    .context("set clearance department")?;
    Ok(row)
}
