//! Shared error types and text helpers.

pub mod converter;
pub mod errors;
