//! Agent gateway boundary: the HTTP/SSE client and the fragment
//! normalization adapter.

pub mod client;
pub mod fragment;

pub use client::HttpAgentGateway;
