//! Shared helpers for filesystem access and external processes.

pub mod fs;
pub mod process;
