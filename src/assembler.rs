//! Line assembly for the inbound serial stream.
//!
//! Status frames arrive one byte at a time. [`FrameAssembler`] collects bytes
//! into a bounded buffer and hands back each complete line, ready for
//! [`FrameCodec::decode`](crate::FrameCodec::decode).
//!
//! Overlong lines are discarded whole: once the buffer fills, bytes are
//! dropped until the next terminator, so a truncated line can never be
//! mistaken for a valid frame.
//!
//! # Example
//!
//! ```rust
//! use trainz_link::{FrameAssembler, FrameCodec, TrainStatus};
//!
//! let codec = FrameCodec::new();
//! let mut status = TrainStatus::new();
//! let mut assembler = FrameAssembler::new();
//!
//! assembler.feed(b"<run:d:2>\r\n<run:a:7>\n", |line| {
//!     codec.decode(line, &mut status);
//! });
//!
//! assert_eq!(status.direction.as_deref(), Some("2"));
//! assert_eq!(status.speed.as_deref(), Some("7"));
//! ```

use heapless::Vec as HVec;
use log::warn;

use crate::config::{LinkConfig, MAX_LINE_LEN};

/// Splits an inbound byte stream into lines.
#[derive(Clone, Debug, Default)]
pub struct FrameAssembler {
    config: LinkConfig,
    /// One spare byte for a `\r` that will be stripped.
    buf: HVec<u8, { MAX_LINE_LEN + 1 }>,
    /// Current line exceeded the limit; drop bytes until the terminator.
    discarding: bool,
    /// The buffer holds a line already returned to the caller.
    line_taken: bool,
}

impl FrameAssembler {
    /// Creates an assembler with the default [`LinkConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an assembler with the given settings.
    pub fn with_config(config: LinkConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Number of bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        if self.line_taken {
            0
        } else {
            self.buf.len()
        }
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
        self.line_taken = false;
    }

    /// Push one byte. Returns the completed line when `byte` is the terminator.
    ///
    /// Empty lines, overlong lines and lines that are not valid UTF-8 yield
    /// `None`.
    pub fn push(&mut self, byte: u8) -> Option<&str> {
        if self.line_taken {
            self.buf.clear();
            self.line_taken = false;
        }

        if byte == self.config.line_terminator {
            if self.discarding {
                self.discarding = false;
                self.buf.clear();
                return None;
            }
            if self.config.strip_carriage_return && self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
            if self.buf.is_empty() {
                return None;
            }

            self.line_taken = true;
            return match core::str::from_utf8(&self.buf) {
                Ok(line) => Some(line),
                Err(e) => {
                    warn!("dropping non-UTF-8 line: {}", e);
                    None
                }
            };
        }

        if self.discarding {
            return None;
        }

        let limit = self.config.max_line_len.min(MAX_LINE_LEN);
        let room = if byte == b'\r' && self.config.strip_carriage_return {
            limit + 1
        } else {
            limit
        };
        if self.buf.len() >= room || self.buf.push(byte).is_err() {
            warn!("line exceeds {} bytes, discarding", limit);
            self.buf.clear();
            self.discarding = true;
        }
        None
    }

    /// Push every byte of `bytes`, calling `on_line` for each completed line.
    ///
    /// Returns the number of lines delivered.
    pub fn feed(&mut self, bytes: &[u8], mut on_line: impl FnMut(&str)) -> usize {
        let mut lines = 0;
        for &byte in bytes {
            if let Some(line) = self.push(byte) {
                on_line(line);
                lines += 1;
            }
        }
        lines
    }
}
