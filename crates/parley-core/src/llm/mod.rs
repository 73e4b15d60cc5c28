//! LLM provider abstractions for parley.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `Responder`: what the turn loop needs from an LLM (history in, one reply out)

pub mod box_provider;
pub mod provider;
pub mod responder;
