//! Tasks that drive the JDK packaging tools.
//!
//! - [`invocation`] - Validated flag lists shared by both tools
//! - [`jpackage`] - One [`PackagingTask`](jpackage::PackagingTask) per output format
//! - [`jlink`] - The runtime image consumed by the runtime-embedded installer

pub mod invocation;
pub mod jlink;
pub mod jpackage;
