//! Shared domain types for Threadline.
//!
//! This crate contains the core domain types used across the Threadline
//! backend: User, Chat, ChatMessage, the normalized agent fragment, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod error;
pub mod user;
