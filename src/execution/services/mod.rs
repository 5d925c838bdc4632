//! Application services for capability execution.

mod config;
mod engine;
mod error;
mod invoker;
mod scope;

pub use config::EngineConfig;
pub use engine::{EngineStats, ExecutionEngine};
pub use error::{ExecutionError, ExecutionServiceResult};
pub use scope::{CancelHandle, ExecutionScope, ScopeEnd};
