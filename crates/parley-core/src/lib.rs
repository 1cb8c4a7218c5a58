//! Business logic and trait definitions for Parley.
//!
//! This crate defines the "ports" (the message store and inference gateway
//! traits) that the infrastructure layer implements. It depends only on
//! `parley-types` -- never on `parley-infra` or any database/IO crate.

pub mod chat;
pub mod gateway;
pub mod store;
