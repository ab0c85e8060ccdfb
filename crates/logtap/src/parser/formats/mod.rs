/// Individual line format parsers

pub mod json;
pub mod plain;

// Re-export parser implementations
pub use json::JsonParser;
pub use plain::PlainTextParser;
