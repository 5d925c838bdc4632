//! Unit tests for the execution engine.

mod domain_tests;
