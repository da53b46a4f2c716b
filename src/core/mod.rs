//! Bank container engine: model, parser and serializer

pub mod bank;
pub mod format;
pub mod item;
pub mod parser;
pub mod serializer;

pub use bank::Bank;
