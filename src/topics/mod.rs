// file: src/topics/mod.rs
// description: topic file discovery and network naming exports
// reference: internal module structure

pub mod naming;
pub mod scanner;

pub use naming::OutputNamer;
pub use scanner::{TopicFile, TopicScanner};
