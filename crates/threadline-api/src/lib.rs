//! REST API application layer for Threadline.
//!
//! Exposes the router, handlers, and application state so integration
//! tests can drive the HTTP surface without a running server.

pub mod http;
pub mod state;
