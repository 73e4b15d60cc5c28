//! Interactive terminal chat for parley.
//!
//! Adapts the core turn loop to a terminal: async line input, a thinking
//! spinner, markdown rendering, and a welcome banner. Entry point:
//! `loop_runner::run_chat`.

pub mod banner;
pub mod input;
pub mod loop_runner;
pub mod output;
pub mod renderer;
