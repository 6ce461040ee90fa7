//! Stdin source: reads byte literals line by line into a `MemSource`
//!
//! Tokens are separated by whitespace; everything after `#` on a line is a
//! comment. Each line is pushed as one slice, so the converter decodes a
//! line in one burst. Lines that are not valid UTF-8 are decoded lossily;
//! their broken tokens are rejected like any other invalid literal.

use byteconv::MemSource;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::literal::parse_byte;

/// Counters for one `feed_lines` run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    pub lines: usize,
    pub bytes: usize,
    pub rejected: usize,
}

/// Push every byte literal of `reader` into `source` until EOF
///
/// Invalid literals are logged and skipped.
///
/// # Errors
///
/// Returns an error if reading fails.
pub async fn feed_lines<R>(mut reader: R, source: &MemSource) -> std::io::Result<FeedStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = FeedStats::default();
    let mut raw = Vec::new();

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).await? == 0 {
            break;
        }
        stats.lines += 1;

        let line = String::from_utf8_lossy(&raw);
        if let std::borrow::Cow::Owned(_) = line {
            warn!(line = stats.lines, "line is not valid UTF-8");
        }
        let content = line.split('#').next().unwrap_or_default();

        let mut bytes = Vec::new();
        for token in content.split_whitespace() {
            match parse_byte(token) {
                Ok(byte) => bytes.push(byte),
                Err(e) => {
                    warn!(line = stats.lines, error = %e, "skipping token");
                    stats.rejected += 1;
                }
            }
        }

        if !bytes.is_empty() {
            source.push_bytes(&bytes);
            stats.bytes += bytes.len();
            debug!(line = stats.lines, bytes = bytes.len(), "line queued");
        }
    }

    Ok(stats)
}
