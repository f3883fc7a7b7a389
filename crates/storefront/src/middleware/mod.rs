//! HTTP middleware and request extractors.

pub mod auth;
pub mod session;
