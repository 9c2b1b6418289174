//! Data models for API requests and persistence.

/// Recipe records, filters and pagination windows.
pub mod recipe;
