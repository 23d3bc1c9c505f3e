use anyhow::Context;
use sqlx::PgPool;

use crate::auth::repo_types::User;

pub async fn list_students(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, role, name, roll_no, course, year, department, created_at
        FROM users
        WHERE role = 'student'
        ORDER BY created_at ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list students")?;
    Ok(rows)
}
