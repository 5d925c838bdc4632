//! In-memory adapters.

mod result_repository;

pub use result_repository::InMemoryExecutionResultRepository;
