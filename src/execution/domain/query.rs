//! Result listing queries.

use super::ExecutionStatus;

/// Default number of results returned by a query.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

/// Selects stored results, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultQuery {
    status: Option<ExecutionStatus>,
    limit: usize,
}

impl Default for ResultQuery {
    fn default() -> Self {
        Self::recent(DEFAULT_QUERY_LIMIT)
    }
}

impl ResultQuery {
    /// Selects the `limit` most recent results.
    #[must_use]
    pub const fn recent(limit: usize) -> Self {
        Self {
            status: None,
            limit,
        }
    }

    /// Restricts the query to one status.
    #[must_use]
    pub const fn with_status(mut self, status: ExecutionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the status filter.
    #[must_use]
    pub const fn status(&self) -> Option<ExecutionStatus> {
        self.status
    }

    /// Returns the result limit.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}
