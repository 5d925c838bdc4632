//! Port contracts for the execution engine.

mod handler;
mod repository;

pub use handler::{AgentHandler, HandlerError, HandlerResult};
#[cfg(test)]
pub use handler::MockAgentHandler;
pub use repository::{
    ExecutionResultRepository, ExecutionResultRepositoryError, ExecutionResultRepositoryResult,
};
