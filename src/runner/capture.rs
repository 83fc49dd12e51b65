//! Line-by-line capture of a launcher's standard output.
//!
//! Lines are decoded lossily so stray non-UTF-8 bytes never abort a
//! benchmark run. Every line is logged at debug level as it arrives and kept
//! in order for time extraction.

use async_stream::stream;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

/// Streams decoded, trimmed lines from `reader` until it reaches end of file.
///
/// A read error ends the stream; it is logged and not propagated.
pub fn lines<R>(reader: R) -> impl Stream<Item = String>
where
    R: AsyncRead + Unpin,
{
    stream! {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    yield decode_line(&buf);
                }
                Err(e) => {
                    warn!("Error reading launcher output: {}", e);
                    break;
                }
            }
        }
    }
}

/// Drains `reader`, logging each line under `job`, and returns the buffer.
pub async fn capture<R>(reader: R, job: &str) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let stream = lines(reader);
    tokio::pin!(stream);

    let mut buffer = Vec::new();
    while let Some(line) = stream.next().await {
        debug!(job = %job, "{}", line);
        buffer.push(line);
    }
    buffer
}

/// Decodes raw bytes as text, replacing invalid sequences, and trims them.
pub fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_string()
}
