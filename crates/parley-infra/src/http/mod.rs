//! HTTP client layer.
//!
//! The networked message store variant: a thin reqwest client speaking the
//! persistence service's API surface.

pub mod message;
