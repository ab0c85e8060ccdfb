//! Framer — byte chunks to complete lines.
//!
//! Lines end at `\n`; one trailing `\r` is stripped. Bytes after the last
//! `\n` stay pending and are prefixed onto the next chunk, so a chunk
//! boundary never splits a record.

use bytes::BytesMut;

/// One framed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedLine {
    pub text: String,
    /// Forced out because the pending bytes exceeded the line limit
    pub oversize: bool,
}

#[derive(Debug)]
pub struct LineFramer {
    pending: BytesMut,
    /// Bytes of `pending` already known to contain no `\n`
    scanned: usize,
    max_line_bytes: usize,
}

impl LineFramer {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            pending: BytesMut::new(),
            scanned: 0,
            max_line_bytes: max_line_bytes.max(1),
        }
    }

    /// Append a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<FramedLine> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();

        while let Some(pos) = self.pending[self.scanned..].iter().position(|b| *b == b'\n') {
            let end = self.scanned + pos;
            let line = self.pending.split_to(end + 1);
            self.scanned = 0;
            lines.push(FramedLine {
                text: decode(strip_terminator(&line)),
                oversize: false,
            });
        }
        self.scanned = self.pending.len();

        if self.pending.len() > self.max_line_bytes {
            let forced = self.pending.split();
            self.scanned = 0;
            lines.push(FramedLine {
                text: decode(&forced),
                oversize: true,
            });
        }

        lines
    }

    /// Take the pending partial line, if any, as a final line.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = self.pending.split();
        self.scanned = 0;
        Some(decode(strip_cr(&rest)))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    strip_cr(line)
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
