//! Backfill — locate where the last N complete lines of a file begin.
//!
//! The scan walks backwards from EOF in fixed-size blocks counting `\n`.
//! Bytes after the last `\n` are an incomplete line and are never counted;
//! reading from the returned offset leaves them pending until terminated.

use std::io::SeekFrom;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

const SCAN_BLOCK: u64 = 64 * 1024;

/// Offset of the first byte of the last `lines` complete lines within the
/// first `len` bytes of `reader`.
///
/// With `lines == 0` this is the end of the last complete line, so only
/// content appended afterwards (plus any pending partial line) is read.
pub async fn backfill_offset<R>(reader: &mut R, len: u64, lines: usize) -> std::io::Result<u64>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let mut newlines_seen = 0usize;
    let mut block = vec![0u8; SCAN_BLOCK as usize];
    let mut end = len;

    while end > 0 {
        let start = end.saturating_sub(SCAN_BLOCK);
        let size = (end - start) as usize;

        reader.seek(SeekFrom::Start(start)).await?;
        reader.read_exact(&mut block[..size]).await?;

        for idx in (0..size).rev() {
            if block[idx] != b'\n' {
                continue;
            }
            newlines_seen += 1;
            let after = start + idx as u64 + 1;
            // The first `\n` from the end terminates the last complete line;
            // each further one marks the start of another complete line.
            if newlines_seen == lines + 1 {
                return Ok(after);
            }
        }
        end = start;
    }

    Ok(0)
}
