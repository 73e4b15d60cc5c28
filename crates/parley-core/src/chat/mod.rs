//! Conversation state and the turn loop.

pub mod console;
pub mod exit;
pub mod session;
pub mod state;
pub mod turn_loop;
