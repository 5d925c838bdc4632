//! Unit tests for capability discovery.

mod domain_tests;
