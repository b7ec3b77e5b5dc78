//! Hardware abstraction traits for digital button inputs.
//!
//! This module defines the interfaces the control box needs from the board so
//! that button handling can run on different platforms (ESP32, any
//! `embedded-hal` pin, desktop mocks).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`InputLine`] | Sample a digital input and configure it as an input |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use trainz_link::traits::{InputLine, Level};
//! use trainz_link::hal::MockLine;
//!
//! let mut line = MockLine::new();
//! line.configure_as_input().unwrap();
//!
//! line.set_level(Level::High);
//! assert_eq!(line.read_level(), Ok(Level::High));
//! ```

/// Direction of train travel, as reported in status frames.
///
/// Frames carry direction as free text; [`Direction::from_text`] maps the
/// spellings the command station uses onto this enum.
///
/// # Default
///
/// Defaults to [`Stopped`](Self::Stopped) for safety.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Moving forward.
    Forward,
    /// Moving in reverse.
    Reverse,
    /// Not moving.
    #[default]
    Stopped,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use trainz_link::Direction;
    ///
    /// assert_eq!(Direction::Forward.as_str(), "forward");
    /// assert_eq!(Direction::Reverse.as_str(), "reverse");
    /// assert_eq!(Direction::Stopped.as_str(), "stopped");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
            Direction::Stopped => "stopped",
        }
    }

    /// Parse direction from frame text.
    ///
    /// Accepts full names (`"forward"`), abbreviations (`"fwd"`) and the
    /// numeric codes (`"1"`, `"-1"`, `"0"`). Input is trimmed and
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use trainz_link::Direction;
    ///
    /// assert_eq!(Direction::from_text("fwd"), Some(Direction::Forward));
    /// assert_eq!(Direction::from_text("-1"), Some(Direction::Reverse));
    /// assert_eq!(Direction::from_text(" STOP "), Some(Direction::Stopped));
    /// assert_eq!(Direction::from_text("2"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        let matches = |names: &[&str]| names.iter().any(|n| n.eq_ignore_ascii_case(s));

        if matches(&["forward", "fwd", "1"]) {
            Some(Direction::Forward)
        } else if matches(&["reverse", "rev", "-1"]) {
            Some(Direction::Reverse)
        } else if matches(&["stopped", "stop", "0"]) {
            Some(Direction::Stopped)
        } else {
            None
        }
    }
}

/// Logic level read from a digital input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Logical high. A button reading high is pressed.
    High,
    /// Logical low.
    #[default]
    Low,
}

impl Level {
    /// Returns true for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// A single digital input line.
///
/// Implement this for whatever the board uses to sample a button pin. The
/// button layer only ever asks for the instantaneous level; debouncing and
/// polling cadence belong to the caller.
///
/// # Implementation Notes
///
/// - `read_level()` must not block
/// - Lines wired active-low should invert in the implementation so that
///   "pressed" always reads as [`Level::High`]
/// - `configure_as_input()` is called once at startup; the default does nothing
///
/// # Example Implementation
///
/// ```rust,ignore
/// use trainz_link::traits::{InputLine, Level};
///
/// struct MyPin { /* hardware handle */ }
///
/// impl InputLine for MyPin {
///     type Error = ();
///
///     fn read_level(&mut self) -> Result<Level, ()> {
///         // Read the GPIO input register...
///         Ok(Level::Low)
///     }
/// }
/// ```
pub trait InputLine {
    /// Error type for line operations.
    type Error;

    /// Sample the current level of the line.
    fn read_level(&mut self) -> Result<Level, Self::Error>;

    /// Put the line into input mode.
    ///
    /// Boards that configure pins at construction can keep the default.
    fn configure_as_input(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: InputLine + ?Sized> InputLine for &mut T {
    type Error = T::Error;

    fn read_level(&mut self) -> Result<Level, Self::Error> {
        (**self).read_level()
    }

    fn configure_as_input(&mut self) -> Result<(), Self::Error> {
        (**self).configure_as_input()
    }
}
