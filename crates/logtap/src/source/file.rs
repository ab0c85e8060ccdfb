//! File source — follow one file by polling, surviving rotation and truncation.
//!
//! Each poll stats the path and compares it with the open handle:
//! - path missing: keep draining the open handle (renamed away) or keep waiting
//! - identity changed: drain the old handle, then read the new file from byte 0
//! - size below the read offset: truncated in place, read again from byte 0
//! - otherwise: read whatever was appended since the last poll

use std::io::{self, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backfill::backfill_offset;
use super::file_id::{identity_changed, FileId};
use super::framer::{FramedLine, LineFramer};
use crate::metrics::IngestMetrics;
use crate::watcher::WatchTarget;

pub const DEFAULT_READ_CHUNK: usize = 64 * 1024;
pub const DEFAULT_MAX_LINE_BYTES: usize = 1_048_576; // 1MB

#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Complete lines replayed from an existing file before following (0 = none)
    pub backfill_lines: usize,
    pub poll_interval: Duration,
    pub max_line_bytes: usize,
    pub read_chunk_bytes: usize,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            backfill_lines: 10,
            poll_interval: Duration::from_millis(250),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            read_chunk_bytes: DEFAULT_READ_CHUNK,
        }
    }
}

struct OpenFile {
    file: File,
    id: Option<FileId>,
}

/// Reader for one [`WatchTarget`]. Owns the file handle exclusively.
pub struct FileSource {
    target: WatchTarget,
    options: SourceOptions,
    metrics: Arc<IngestMetrics>,
    framer: LineFramer,
    open: Option<OpenFile>,
    /// Backfill applies only to a file already present at the first poll
    backfill_pending: bool,
    waiting_logged: bool,
    buf: Vec<u8>,
}

impl FileSource {
    pub fn new(target: WatchTarget, options: SourceOptions, metrics: Arc<IngestMetrics>) -> Self {
        let framer = LineFramer::new(options.max_line_bytes);
        let buf = vec![0u8; options.read_chunk_bytes.max(1)];

        Self {
            target,
            options,
            metrics,
            framer,
            open: None,
            backfill_pending: true,
            waiting_logged: false,
            buf,
        }
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Poll until cancelled. Returns an error only for I/O failures that end
    /// this file's loop; a missing file is waited for, not an error.
    pub async fn follow<F>(mut self, cancel: CancellationToken, mut emit: F) -> io::Result<()>
    where
        F: FnMut(FramedLine),
    {
        while !cancel.is_cancelled() {
            self.poll_once(&cancel, &mut emit).await?;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.options.poll_interval) => {}
            }
        }

        debug!(path = %self.target.path().display(), "file loop stopped");
        self.open = None;
        Ok(())
    }

    /// One poll: detect rotation/truncation, then read everything appended.
    pub async fn poll_once<F>(&mut self, cancel: &CancellationToken, emit: &mut F) -> io::Result<()>
    where
        F: FnMut(FramedLine),
    {
        let on_disk = match tokio::fs::metadata(self.target.path()).await {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        let Some(meta) = on_disk else {
            if self.open.is_some() {
                // Renamed or deleted underneath us: drain what the handle still sees.
                return self.read_available(cancel, emit).await;
            }
            if !self.waiting_logged {
                debug!(path = %self.target.path().display(), "waiting for file to appear");
                self.waiting_logged = true;
            }
            // Everything in a file created later is new content.
            self.backfill_pending = false;
            return Ok(());
        };

        let open_id = self.open.as_ref().map(|open| open.id);
        match open_id {
            None => {
                if !self.open_file().await? {
                    return Ok(());
                }
            }
            Some(open_id) if identity_changed(open_id, FileId::from_metadata(&meta)) => {
                self.read_available(cancel, emit).await?;
                self.end_generation(emit, "file replaced");
                self.open = None;
                if !self.open_file().await? {
                    return Ok(());
                }
            }
            Some(_) if meta.len() < self.target.position() => {
                self.end_generation(emit, "file truncated");
            }
            Some(_) => {}
        }

        self.read_available(cancel, emit).await
    }

    /// Open the path. `Ok(false)` when it vanished between stat and open.
    async fn open_file(&mut self) -> io::Result<bool> {
        let mut file = match File::open(self.target.path()).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        let metadata = file.metadata().await?;
        let id = FileId::from_metadata(&metadata);

        let start = if self.backfill_pending {
            backfill_offset(&mut file, metadata.len(), self.options.backfill_lines).await?
        } else {
            0
        };
        self.backfill_pending = false;
        self.waiting_logged = false;
        self.target.set_position(start);

        info!(
            path = %self.target.path().display(),
            offset = start,
            generation = self.target.rotation_generation(),
            "following file"
        );

        self.open = Some(OpenFile { file, id });
        Ok(true)
    }

    /// Read from the current offset to EOF, framing and emitting lines.
    async fn read_available<F>(&mut self, cancel: &CancellationToken, emit: &mut F) -> io::Result<()>
    where
        F: FnMut(FramedLine),
    {
        let Some(open) = self.open.as_mut() else {
            return Ok(());
        };

        let mut position = self.target.position();
        open.file.seek(SeekFrom::Start(position)).await?;

        while !cancel.is_cancelled() {
            let n = open.file.read(&mut self.buf).await?;
            if n == 0 {
                break;
            }
            position += n as u64;
            self.target.set_position(position);

            for line in self.framer.push(&self.buf[..n]) {
                if line.oversize {
                    self.metrics.record_oversize();
                    warn!(
                        path = %self.target.path().display(),
                        bytes = line.text.len(),
                        "line exceeded max_line_bytes, emitting it unterminated"
                    );
                }
                emit(line);
            }
        }

        Ok(())
    }

    /// Close out the current generation; a pending partial line is emitted
    /// rather than dropped, since its file will never complete it.
    fn end_generation<F>(&mut self, emit: &mut F, reason: &'static str)
    where
        F: FnMut(FramedLine),
    {
        if let Some(rest) = self.framer.finish() {
            emit(FramedLine {
                text: rest,
                oversize: false,
            });
        }

        let generation = self.target.next_generation();
        self.metrics.record_rotation();
        info!(
            path = %self.target.path().display(),
            generation,
            reason,
            "rotation detected, reading from start"
        );
    }
}

/// Read a whole file once (no following). A final unterminated line is
/// emitted since nothing will complete it. Returns the number of lines.
pub async fn read_to_end<F>(path: &Path, max_line_bytes: usize, mut emit: F) -> io::Result<u64>
where
    F: FnMut(FramedLine),
{
    let mut file = File::open(path).await?;
    let mut framer = LineFramer::new(max_line_bytes);
    let mut buf = vec![0u8; DEFAULT_READ_CHUNK];
    let mut count = 0u64;

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        for line in framer.push(&buf[..n]) {
            count += 1;
            emit(line);
        }
    }

    if let Some(rest) = framer.finish() {
        count += 1;
        emit(FramedLine {
            text: rest,
            oversize: false,
        });
    }

    Ok(count)
}
