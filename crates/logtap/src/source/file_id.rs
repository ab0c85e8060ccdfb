//! File identity — device + inode on Unix.
//!
//! Identity survives renames, so a changed identity behind the same path means
//! the path now names a different file (rotation by rename/recreate). Platforms
//! without a stable identity report `None` and rely on the size-shrink check.

use std::fs::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    dev: u64,
    ino: u64,
}

impl FileId {
    pub fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }

    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;

        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.dev, self.ino)
    }
}

/// True only when both identities are known and differ.
pub fn identity_changed(open: Option<FileId>, on_disk: Option<FileId>) -> bool {
    matches!((open, on_disk), (Some(a), Some(b)) if a != b)
}
