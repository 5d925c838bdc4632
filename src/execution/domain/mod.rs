//! Domain model for capability execution.
//!
//! Requests, results with their monotonic status machine, and sequential
//! chains. Timestamps come from an injected [`mockable::Clock`].

mod chain;
mod error;
mod ids;
mod query;
mod request;
mod result;
mod status;

pub use chain::{ChainExecution, ExecutionStep};
pub use error::{ExecutionDomainError, ParseExecutionStatusError};
pub use ids::{ChainId, ExecutionId, RequestId};
pub use query::{DEFAULT_QUERY_LIMIT, ResultQuery};
pub use request::{ExecutionContext, ExecutionRequest, Priority};
pub use result::{ExecutionMetrics, ExecutionResult};
pub use status::ExecutionStatus;
