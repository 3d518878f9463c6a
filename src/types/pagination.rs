//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_OFFSET, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

const MAX_OFFSET: u64 = i64::MAX as u64;

/// Offset/limit query parameters (`?skip=0&limit=100`)
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of users to skip
    #[serde(default = "default_skip")]
    #[param(example = 0)]
    pub skip: u64,
    /// Maximum number of users to return (capped at 1000)
    #[serde(default = "default_limit")]
    #[param(example = 100)]
    pub limit: u64,
}

fn default_skip() -> u64 {
    DEFAULT_PAGE_OFFSET
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl ListParams {
    /// Offset for database query.
    ///
    /// Bound as a signed 64-bit integer by the database drivers, so larger
    /// values are clamped (the window is empty either way).
    pub fn offset(&self) -> u64 {
        self.skip.min(MAX_OFFSET)
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: DEFAULT_PAGE_OFFSET,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}
