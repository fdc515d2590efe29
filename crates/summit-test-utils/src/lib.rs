//! Shared test fixtures for the SummitSelect workspace.

pub mod fixtures;

pub use pretty_assertions::{assert_eq, assert_ne};
