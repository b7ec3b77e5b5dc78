//! Control box configuration: the button table and the serial link settings.
//!
//! Uses `heapless` collections for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use trainz_link::config::{ButtonTable, Config, LinkConfig};
//! use trainz_link::{ButtonKind, ButtonSpec};
//!
//! // Use defaults (the five-button control box)
//! let config = Config::default();
//! assert_eq!(config.buttons.len(), 5);
//!
//! // Or customize
//! let buttons = ButtonTable::new()
//!     .with_button(ButtonSpec::new(12, 'h', ButtonKind::from_text("horn")).unwrap())
//!     .unwrap();
//! let config = Config::default()
//!     .with_buttons(buttons)
//!     .with_link(LinkConfig::default().with_max_line_len(64));
//! ```

use heapless::String as HString;
use heapless::Vec as HVec;

use crate::button::{ButtonKind, ButtonSpec, PinId};

/// Maximum number of buttons in a table.
pub const MAX_BUTTONS: usize = 8;

/// Maximum length of an inbound line, terminator excluded.
pub const MAX_LINE_LEN: usize = 128;

// ============================================================================
// Helpers
// ============================================================================

/// Copy `s` into a heapless string, truncating at a character boundary if too long.
pub fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut out = HString::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid button configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Command characters must be ASCII (one byte on the wire).
    NonAsciiCommand(char),
    /// Two buttons would send the same character.
    DuplicateCommand(char),
    /// Two buttons are bound to the same input line.
    DuplicatePin(PinId),
    /// The table is at capacity.
    TableFull,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NonAsciiCommand(c) => write!(f, "command {:?} is not ASCII", c),
            ConfigError::DuplicateCommand(c) => write!(f, "command {:?} is already bound", c),
            ConfigError::DuplicatePin(pin) => write!(f, "pin {} is already bound", pin),
            ConfigError::TableFull => write!(f, "button table is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Reject `spec` if it reuses a pin or command character from `existing`.
pub(crate) fn check_unique<'a>(
    mut existing: impl Iterator<Item = &'a ButtonSpec>,
    spec: &ButtonSpec,
) -> Result<(), ConfigError> {
    existing.try_for_each(|other| {
        if other.pin() == spec.pin() {
            Err(ConfigError::DuplicatePin(spec.pin()))
        } else if other.command() == spec.command() {
            Err(ConfigError::DuplicateCommand(spec.command()))
        } else {
            Ok(())
        }
    })
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete control box configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Inbound serial link settings
    pub link: LinkConfig,
    /// Button bindings
    pub buttons: ButtonTable,
}

impl Config {
    /// Set link configuration
    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    /// Set the button table
    pub fn with_buttons(mut self, buttons: ButtonTable) -> Self {
        self.buttons = buttons;
        self
    }
}

// ============================================================================
// Link Config
// ============================================================================

/// Settings for splitting the inbound byte stream into lines
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Byte that ends a line
    pub line_terminator: u8,
    /// Longest accepted line, terminator excluded (at most [`MAX_LINE_LEN`])
    pub max_line_len: usize,
    /// Drop a `\r` immediately before the terminator
    pub strip_carriage_return: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            line_terminator: b'\n',
            max_line_len: MAX_LINE_LEN,
            strip_carriage_return: true,
        }
    }
}

impl LinkConfig {
    /// Set the line terminator
    pub fn with_line_terminator(mut self, terminator: u8) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// Set the maximum line length, clamped to `1..=MAX_LINE_LEN`
    pub fn with_max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len.clamp(1, MAX_LINE_LEN);
        self
    }

    /// Set whether a trailing `\r` is dropped
    pub fn with_strip_carriage_return(mut self, strip: bool) -> Self {
        self.strip_carriage_return = strip;
        self
    }
}

// ============================================================================
// Button Table
// ============================================================================

/// GPIO assignments of the stock control box.
pub mod control_box {
    use crate::button::PinId;

    /// Forward button
    pub const FORWARD_PIN: PinId = 2;
    /// Reverse button
    pub const REVERSE_PIN: PinId = 3;
    /// Speed up button
    pub const FASTER_PIN: PinId = 4;
    /// Slow down button
    pub const SLOWER_PIN: PinId = 5;
    /// Stop button
    pub const STOP_PIN: PinId = 6;
}

/// Fixed table of button bindings.
///
/// Pins and command characters are unique within a table. Serialized as a
/// list of bindings; deserialization goes through [`ButtonTable::push`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "HVec<ButtonSpec, MAX_BUTTONS>",
        into = "HVec<ButtonSpec, MAX_BUTTONS>"
    )
)]
pub struct ButtonTable {
    buttons: HVec<ButtonSpec, MAX_BUTTONS>,
}

impl Default for ButtonTable {
    fn default() -> Self {
        Self::control_box()
    }
}

impl ButtonTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { buttons: HVec::new() }
    }

    /// The stock five-button control box.
    ///
    /// | Pin | Char | Kind |
    /// |-----|------|------|
    /// | 2 | `f` | Direction (forward) |
    /// | 3 | `r` | Direction (reverse) |
    /// | 4 | `+` | Speed (faster) |
    /// | 5 | `-` | Speed (slower) |
    /// | 6 | `s` | Stop |
    pub fn control_box() -> Self {
        use control_box::*;

        let specs = [
            ButtonSpec::known(FORWARD_PIN, 'f', ButtonKind::Direction),
            ButtonSpec::known(REVERSE_PIN, 'r', ButtonKind::Direction),
            ButtonSpec::known(FASTER_PIN, '+', ButtonKind::Speed),
            ButtonSpec::known(SLOWER_PIN, '-', ButtonKind::Speed),
            ButtonSpec::known(STOP_PIN, 's', ButtonKind::Stop),
        ];

        let mut table = Self::new();
        for spec in specs {
            let _ = table.buttons.push(spec);
        }
        table
    }

    /// Add a binding.
    pub fn push(&mut self, spec: ButtonSpec) -> Result<(), ConfigError> {
        check_unique(self.buttons.iter(), &spec)?;
        self.buttons.push(spec).map_err(|_| ConfigError::TableFull)
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_button(mut self, spec: ButtonSpec) -> Result<Self, ConfigError> {
        self.push(spec)?;
        Ok(self)
    }

    /// Bindings in table order.
    pub fn iter(&self) -> core::slice::Iter<'_, ButtonSpec> {
        self.buttons.iter()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Returns true if the table has no bindings.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Binding that sends `command`, if any.
    pub fn find_by_command(&self, command: char) -> Option<&ButtonSpec> {
        self.buttons.iter().find(|spec| spec.command() == command)
    }
}

impl TryFrom<HVec<ButtonSpec, MAX_BUTTONS>> for ButtonTable {
    type Error = ConfigError;

    fn try_from(specs: HVec<ButtonSpec, MAX_BUTTONS>) -> Result<Self, ConfigError> {
        specs.into_iter().try_fold(Self::new(), Self::with_button)
    }
}

impl From<ButtonTable> for HVec<ButtonSpec, MAX_BUTTONS> {
    fn from(table: ButtonTable) -> Self {
        table.buttons
    }
}

impl<'a> IntoIterator for &'a ButtonTable {
    type Item = &'a ButtonSpec;
    type IntoIter = core::slice::Iter<'a, ButtonSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
