//! Unit tests for the capability catalogue.
