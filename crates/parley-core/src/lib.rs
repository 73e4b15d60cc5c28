//! Conversation core for parley.
//!
//! Defines the append-only conversation state, the turn loop that drives a
//! dialogue, and the "ports" the loop talks through: console input/output
//! and the [`Responder`](llm::responder::Responder) that produces replies.
//! Depends only on `parley-types` -- never on `parley-infra` or any
//! network/IO crate.

pub mod chat;
pub mod llm;
