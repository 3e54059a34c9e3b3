//! Framed I/O for the IMAP protocol.
//!
//! IMAP responses are CRLF-terminated lines, except that a line may announce
//! a literal (`{n}` at the end) in which case exactly n raw octets follow,
//! then the line continues. [`FramedStream::read_response`] stitches a full
//! response together so the parser can work on one complete unit.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::Result;

const READ_BUFFER_SIZE: usize = 8192;

/// Upper bound on a single response line.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Upper bound on a single literal. Message bodies arrive as literals, so
/// this caps per-message memory.
const MAX_LITERAL_SIZE: usize = 32 * 1024 * 1024;

/// Framed connection for the IMAP protocol.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new framed stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
        }
    }

    /// Reads one complete response, including any embedded literals.
    pub async fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();

        loop {
            let line = self.read_line().await?;
            response.extend_from_slice(&line);

            let Some(literal_len) = trailing_literal_len(&line) else {
                return Ok(response);
            };
            if literal_len > MAX_LITERAL_SIZE {
                return Err(crate::Error::Protocol(format!(
                    "literal too large: {literal_len} bytes (max {MAX_LITERAL_SIZE})"
                )));
            }

            let mut literal = vec![0u8; literal_len];
            self.reader.read_exact(&mut literal).await?;
            response.extend_from_slice(&literal);
            // The line resumes after the literal; keep reading
        }
    }

    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Err(crate::Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }

            // The terminator may straddle two reads: CR at the end of the
            // previous chunk, LF at the start of this one.
            if line.last() == Some(&b'\r') && buf[0] == b'\n' {
                line.push(b'\n');
                self.reader.consume(1);
                return Ok(line);
            }

            if let Some(pos) = buf.windows(2).position(|w| w == b"\r\n") {
                line.extend_from_slice(&buf[..pos + 2]);
                self.reader.consume(pos + 2);
                return Ok(line);
            }

            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > MAX_LINE_LENGTH {
                return Err(crate::Error::Protocol("line too long".to_string()));
            }
        }
    }

    /// Writes a serialized command and flushes it.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(data);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buffer).await?;
        stream.flush().await?;

        Ok(())
    }

    /// Consumes the framed stream and returns the inner stream.
    ///
    /// Used for the STARTTLS upgrade, which happens at a point where the
    /// server has nothing in flight, so losing buffered data is acceptable.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// Returns the length of a literal announced at the end of a line
/// (`...{123}\r\n` or `...{123+}\r\n`), if any.
fn trailing_literal_len(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"\r\n")?;
    let line = line.strip_suffix(b"}")?;
    let line = line.strip_suffix(b"+").unwrap_or(line);
    let open = line.iter().rposition(|&b| b == b'{')?;
    let digits = &line[open + 1..];
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Accumulates responses until the tagged response for a command arrives.
pub struct ResponseAccumulator {
    tag: String,
}

impl ResponseAccumulator {
    /// Creates a new accumulator for the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Reads responses until one starts with our tag followed by a space.
    pub async fn read_until_tagged<S>(&self, framed: &mut FramedStream<S>) -> Result<Vec<Vec<u8>>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut responses = Vec::new();
        loop {
            let response = framed.read_response().await?;
            let is_tagged = response.starts_with(self.tag.as_bytes())
                && response.get(self.tag.len()) == Some(&b' ');
            responses.push(response);
            if is_tagged {
                return Ok(responses);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[test]
    fn trailing_literal_detection() {
        assert_eq!(trailing_literal_len(b"* 1 FETCH (BODY[] {123}\r\n"), Some(123));
        assert_eq!(trailing_literal_len(b"* 1 FETCH (BODY[] {123+}\r\n"), Some(123));
        assert_eq!(trailing_literal_len(b"{0}\r\n"), Some(0));
        assert_eq!(trailing_literal_len(b"plain line\r\n"), None);
        assert_eq!(trailing_literal_len(b"no crlf {5}"), None);
        assert_eq!(trailing_literal_len(b"bad digits {1a2}\r\n"), None);
        assert_eq!(trailing_literal_len(b"empty braces {}\r\n"), None);
    }

    #[tokio::test]
    async fn read_simple_line() {
        let mock = Builder::new().read(b"* OK ready\r\n").build();
        let mut framed = FramedStream::new(mock);

        let response = framed.read_response().await.unwrap();
        assert_eq!(response, b"* OK ready\r\n");
    }

    #[tokio::test]
    async fn read_response_with_literal() {
        let mock = Builder::new()
            .read(b"* 1 FETCH (BODY[] {5}\r\n")
            .read(b"hello)\r\n")
            .build();
        let mut framed = FramedStream::new(mock);

        let response = framed.read_response().await.unwrap();
        assert_eq!(response, b"* 1 FETCH (BODY[] {5}\r\nhello)\r\n");
    }

    #[tokio::test]
    async fn read_response_with_literal_containing_crlf() {
        let mock = Builder::new()
            .read(b"* 2 FETCH (BODY[] {12}\r\n")
            .read(b"ab\r\ncd\r\nef\r\n")
            .read(b")\r\n")
            .build();
        let mut framed = FramedStream::new(mock);

        let response = framed.read_response().await.unwrap();
        assert_eq!(response, b"* 2 FETCH (BODY[] {12}\r\nab\r\ncd\r\nef\r\n)\r\n");
    }

    #[tokio::test]
    async fn terminator_split_across_reads() {
        let mock = Builder::new()
            .read(b"* OK ready\r")
            .read(b"\n* 5 EXISTS\r\n")
            .build();
        let mut framed = FramedStream::new(mock);

        let first = framed.read_response().await.unwrap();
        assert_eq!(first, b"* OK ready\r\n");
        let second = framed.read_response().await.unwrap();
        assert_eq!(second, b"* 5 EXISTS\r\n");
    }

    #[tokio::test]
    async fn write_command_flushes() {
        let mock = Builder::new().write(b"A001 NOOP\r\n").build();
        let mut framed = FramedStream::new(mock);

        framed.write_command(b"A001 NOOP\r\n").await.unwrap();
    }

    #[tokio::test]
    async fn accumulator_stops_at_tagged_response() {
        let mock = Builder::new()
            .read(b"* SEARCH 1 2\r\n")
            .read(b"* 2 EXISTS\r\n")
            .read(b"A003 OK SEARCH completed\r\n")
            .build();
        let mut framed = FramedStream::new(mock);

        let responses = ResponseAccumulator::new("A003")
            .read_until_tagged(&mut framed)
            .await
            .unwrap();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[2], b"A003 OK SEARCH completed\r\n");
    }

    #[tokio::test]
    async fn accumulator_ignores_tag_prefix_without_space() {
        let mock = Builder::new()
            .read(b"A0030 OK unrelated\r\n")
            .read(b"A003 OK done\r\n")
            .build();
        let mut framed = FramedStream::new(mock);

        let responses = ResponseAccumulator::new("A003")
            .read_until_tagged(&mut framed)
            .await
            .unwrap();

        assert_eq!(responses.len(), 2);
    }

    #[tokio::test]
    async fn oversized_literal_is_rejected() {
        let header = format!("* 1 FETCH (BODY[] {{{}}}\r\n", MAX_LITERAL_SIZE + 1);
        let mock = Builder::new().read(header.as_bytes()).build();
        let mut framed = FramedStream::new(mock);

        let result = framed.read_response().await;
        assert!(result.unwrap_err().to_string().contains("literal too large"));
    }

    #[tokio::test]
    async fn oversized_line_is_rejected() {
        let long_line = "X".repeat(MAX_LINE_LENGTH + 16);
        let mock = Builder::new().read(long_line.as_bytes()).build();
        let mut framed = FramedStream::new(mock);

        let result = framed.read_response().await;
        assert!(result.unwrap_err().to_string().contains("line too long"));
    }

    #[tokio::test]
    async fn eof_is_an_error() {
        let mock = Builder::new().build();
        let mut framed = FramedStream::new(mock);

        assert!(framed.read_response().await.is_err());
    }
}
