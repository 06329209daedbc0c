// file: src/exporter/mod.rs
// description: report exporters

pub mod json;

pub use json::JsonExporter;
