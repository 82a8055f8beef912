//! HTTP client module for the forecast service.
//!
//! This module provides the `ApiClient` for requesting a short-horizon
//! forecast for a named city, and `ApiError` for classifying failures.
//!
//! The service is unauthenticated; a request is a single GET with the city
//! and offline flag as query parameters.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
