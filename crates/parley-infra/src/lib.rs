//! Infrastructure layer for parley.
//!
//! Implements the ports defined in `parley-core` against the outside world:
//! the Anthropic Messages API, `config.toml` on disk, and credentials from
//! the process environment.

pub mod config;
pub mod llm;
pub mod paths;
pub mod secret;
