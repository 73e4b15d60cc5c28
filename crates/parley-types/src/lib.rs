//! Shared domain types for parley.
//!
//! Conversation messages, LLM request/response shapes, chat configuration,
//! and the error enums shared between the core and infrastructure crates.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
