//! Adapter implementations for execution ports.

mod builtin;
pub mod memory;
mod scripted;

pub use builtin::BuiltinHandler;
pub use scripted::{Invocation, ScriptedHandler};
