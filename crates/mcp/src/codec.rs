// Newline-delimited request framing

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

/// One input frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Raw line without its trailing `\n`. Not guaranteed to be UTF-8.
    Line(BytesMut),
    /// A line exceeded the length limit. The rest of it is skipped silently
    /// and decoding resumes after the next `\n`.
    TooLong,
}

/// Splits input on `\n` like `LinesCodec`, but keeps raw bytes and treats
/// an over-long line as a frame instead of a terminal error, so the stream
/// stays usable afterwards.
#[derive(Debug, Clone)]
pub struct RequestCodec {
    max_length: usize,
    next_index: usize,
    discarding: bool,
}

impl RequestCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: false,
        }
    }
}

impl Decoder for RequestCodec {
    type Item = Frame;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, Self::Error> {
        loop {
            let read_to = std::cmp::min(self.max_length.saturating_add(1), buf.len());
            let newline = buf[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    buf.advance(self.next_index + offset + 1);
                    self.discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    buf.advance(read_to);
                    self.next_index = 0;
                    if buf.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(offset)) => {
                    let end = self.next_index + offset;
                    self.next_index = 0;
                    let mut line = buf.split_to(end + 1);
                    line.truncate(end);
                    return Ok(Some(Frame::Line(line)));
                }
                (false, None) if buf.len() > self.max_length => {
                    self.discarding = true;
                    self.next_index = 0;
                    return Ok(Some(Frame::TooLong));
                }
                (false, None) => {
                    self.next_index = read_to;
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, Self::Error> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }

        self.next_index = 0;
        if self.discarding {
            buf.clear();
            self.discarding = false;
            return Ok(None);
        }
        if buf.is_empty() {
            return Ok(None);
        }

        // Last line without a trailing newline
        Ok(Some(Frame::Line(buf.split_to(buf.len()))))
    }
}
