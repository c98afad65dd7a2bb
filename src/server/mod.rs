//! HTTP server implementation
//!
//! This module provides the HTTP server, shared state and route handlers.

pub mod routes;
pub mod server;
pub mod state;

pub use server::{run_server, HttpServer};
