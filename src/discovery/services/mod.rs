//! Application services for capability discovery.

mod discovery;

pub use discovery::DiscoveryService;
