//! HTTP/JSON API for the curriculum store.
//!
//! Exposes course, program and membership operations over REST. Request
//! handling stays thin: every handler locks the shared connection, calls one
//! `curriculum_core` service, and maps the outcome to a status code.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
