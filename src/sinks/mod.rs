//! Sink implementations

pub mod console;
pub mod memory;
pub mod rotating_file;

pub use console::{ConsoleSink, ConsoleTarget};
pub use memory::MemorySink;
pub use rotating_file::{RotatingFileSink, RotationPolicy};

pub use crate::core::Sink;
