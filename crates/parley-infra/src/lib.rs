//! Infrastructure implementations for Parley.
//!
//! Concrete message stores (SQLite, local JSON files, HTTP client), the
//! hosted inference gateway client, and configuration loading. Everything
//! here implements traits defined in `parley-core`.

pub mod config;
pub mod gateway;
pub mod http;
pub mod localfile;
pub mod sqlite;
