//! HTTP request handlers for the persistence service.

pub mod chat;
pub mod message;
