use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    policy::{self, Action},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_students: i64,
    pub completed_clearances: i64,
    pub pending_clearances: i64,
}

/// Dashboard counters, derived on every read. `pending` is the
/// remainder; a completed clearance always belongs to a student, so it
/// can never go negative.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StatsResponse>, AppError> {
    policy::authorize(&user, Action::ViewStats)?;

    let total_students: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'student'")
            .fetch_one(&state.db)
            .await?;
    let completed_clearances: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM clearances WHERE status = 'completed'")
            .fetch_one(&state.db)
            .await?;

    Ok(Json(StatsResponse {
        total_students,
        completed_clearances,
        pending_clearances: total_students - completed_clearances,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(StatsResponse {
            total_students: 10,
            completed_clearances: 3,
            pending_clearances: 7,
        })
        .unwrap();
        assert_eq!(json["totalStudents"], 10);
        assert_eq!(json["completedClearances"], 3);
        assert_eq!(json["pendingClearances"], 7);
    }
}
