//! Mock implementations for testing without hardware.
//!
//! These test doubles let the button logic run and be tested on desktop
//! without physical hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockLine`] | [`InputLine`] | Settable level, read counting, injected failures |
//! | [`MockSink`] | [`CommandSink`] | Records transmitted command characters |
//!
//! # Example
//!
//! ```rust
//! use trainz_link::{Button, ButtonKind, ButtonSpec};
//! use trainz_link::hal::MockLine;
//! use trainz_link::traits::Level;
//!
//! let spec = ButtonSpec::new(2, 'f', ButtonKind::Direction).unwrap();
//! let mut button = Button::new(spec, MockLine::new());
//!
//! assert!(!button.is_pressed());
//! button.line_mut().set_level(Level::High);
//! assert!(button.is_pressed());
//! assert_eq!(button.line().read_count, 2);
//! ```
//!
//! [`InputLine`]: crate::traits::InputLine
//! [`CommandSink`]: crate::traits::CommandSink

use alloc::vec::Vec;

use crate::traits::{CommandSink, InputLine, Level};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock input line for testing.
///
/// Reads return whatever level was last set. Use the public fields to
/// inspect how the line was used.
///
/// # Example
///
/// ```rust
/// use trainz_link::hal::MockLine;
/// use trainz_link::traits::{InputLine, Level};
///
/// let mut line = MockLine::with_level(Level::High);
/// assert_eq!(line.read_level(), Ok(Level::High));
///
/// line.fail_reads = true;
/// assert_eq!(line.read_level(), Err(()));
/// ```
#[derive(Debug, Default)]
pub struct MockLine {
    /// Level returned by reads.
    pub level: Level,
    /// Whether `configure_as_input` has been called.
    pub configured: bool,
    /// Number of read attempts.
    pub read_count: usize,
    /// Make every read fail.
    pub fail_reads: bool,
}

impl MockLine {
    /// Creates a released (low) line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a line reading `level`.
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Set the level returned by subsequent reads.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }
}

impl InputLine for MockLine {
    type Error = ();

    fn read_level(&mut self) -> Result<Level, ()> {
        self.read_count += 1;
        if self.fail_reads {
            Err(())
        } else {
            Ok(self.level)
        }
    }

    fn configure_as_input(&mut self) -> Result<(), ()> {
        self.configured = true;
        Ok(())
    }
}

// ============================================================================
// Link Mocks
// ============================================================================

/// Mock command sink for testing.
///
/// Records every character sent.
#[derive(Debug, Default)]
pub struct MockSink {
    /// Characters sent, in order.
    pub sent: Vec<char>,
    /// Make every send fail.
    pub fail_sends: bool,
}

impl MockSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything sent so far.
    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl CommandSink for MockSink {
    type Error = ();

    fn send_command(&mut self, command: char) -> Result<(), ()> {
        if self.fail_sends {
            return Err(());
        }
        self.sent.push(command);
        Ok(())
    }
}
