//! Command-line interface.
//!
//! # Module Structure
//!
//! - [`args`]: clap argument definitions
//! - [`init`]: blog scaffolding
//! - [`post`]: authoring operations (insert, update, print)
//! - [`serve`]: the HTTP server

mod args;
pub mod init;
pub mod post;
pub mod serve;

pub use args::{Cli, Commands};
