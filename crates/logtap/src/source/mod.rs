//! Source module — reading lines out of files.

pub mod backfill;
pub mod file;
pub mod file_id;
pub mod framer;

pub use file::{read_to_end, FileSource, SourceOptions, DEFAULT_MAX_LINE_BYTES, DEFAULT_READ_CHUNK};
pub use file_id::FileId;
pub use framer::{FramedLine, LineFramer};
