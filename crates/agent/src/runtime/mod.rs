//! Runtime module — process lifecycle: logging, boot, CLI.

pub mod boot;
pub mod cli;
