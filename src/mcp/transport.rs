//! Newline-delimited JSON framing over a duplex byte stream.
//!
//! Each message is one JSON document on its own line. The reader half skips
//! blank lines; the writer half appends `\n` and flushes after every message.

use serde::Serialize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

// ============================================================================
// Transport Error Types
// ============================================================================

/// Errors specific to transport operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TransportError {
    /// Create an I/O error.
    pub fn io<E: std::fmt::Display>(err: E) -> Self {
        TransportError::Io(err.to_string())
    }

    /// Create a serialization error.
    pub fn serialization<E: std::fmt::Display>(err: E) -> Self {
        TransportError::Serialization(err.to_string())
    }
}

// ============================================================================
// Reader / Writer halves
// ============================================================================

/// Reads one raw message per line.
///
/// Lines are returned as bytes; decoding is left to the caller so that a
/// line with invalid UTF-8 does not end the stream.
pub struct MessageReader<R> {
    reader: R,
    line: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> MessageReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
        }
    }

    /// Returns the next non-blank line without its terminator, or `None` at
    /// end of input.
    pub async fn next_message(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.line)
                .await
                .map_err(|e| TransportError::io(format!("Failed to read message: {}", e)))?;
            if read == 0 {
                return Ok(None);
            }

            let message = self.line.trim_ascii();
            if message.is_empty() {
                continue;
            }

            trace!("Read message from input: {} bytes", read);
            return Ok(Some(message.to_vec()));
        }
    }
}

/// Writes one serialized message per line.
pub struct MessageWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_message<T: Serialize>(&mut self, message: &T) -> Result<(), TransportError> {
        let body = serde_json::to_string(message).map_err(|e| {
            TransportError::serialization(format!("Failed to serialize message: {}", e))
        })?;
        let framed = format!("{}\n", body);

        self.writer
            .write_all(framed.as_bytes())
            .await
            .map_err(|e| TransportError::io(format!("Failed to write message: {}", e)))?;
        self.writer
            .flush()
            .await
            .map_err(|e| TransportError::io(format!("Failed to flush: {}", e)))?;

        trace!("Wrote message to output: {} bytes", framed.len());
        Ok(())
    }
}

/// Reader and writer bound to the process's standard input and output.
pub fn stdio() -> (MessageReader<BufReader<io::Stdin>>, MessageWriter<io::Stdout>) {
    (
        MessageReader::new(BufReader::new(io::stdin())),
        MessageWriter::new(io::stdout()),
    )
}
