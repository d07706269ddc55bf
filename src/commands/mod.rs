//! CLI commands

pub mod clean;
pub mod fetch;
pub mod generate;
pub mod init;
