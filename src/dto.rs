use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Page-based pagination with a bounded page size.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    50
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pagination {
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit_offset(self) -> (i64, i64) {
        let limit = self.limit.clamp(1, Self::MAX_LIMIT);
        let page = self.page.max(1);
        // Saturate so an absurd ?page= cannot overflow the multiply; a
        // huge offset just yields an empty page.
        let offset = page.saturating_sub(1).saturating_mul(limit);
        (limit, offset)
    }
}
