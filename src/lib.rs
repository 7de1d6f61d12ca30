//! Library side of the `change-remote` tool.
//!
//! The binary is a thin shim over [`cli::run`]; everything else is exposed so
//! the workflow can be driven with a different [`git::CommandRunner`].

pub mod cli;
pub mod config;
pub mod git;
pub mod render;
pub mod url;
