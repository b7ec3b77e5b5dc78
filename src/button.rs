//! Control box buttons.
//!
//! Each physical button is described by a [`ButtonSpec`]: the input line it
//! is wired to, the single ASCII character it sends when pressed, and what it
//! means in the control vocabulary ([`ButtonKind`]). A [`Button`] binds a spec
//! to a concrete [`InputLine`]; a [`ButtonMap`] holds the whole control box.
//!
//! Buttons are level-sampled: [`Button::is_pressed`] reports the line as it
//! is right now. Debouncing, edge detection and polling cadence are the
//! caller's business.
//!
//! # Example
//!
//! ```rust
//! use trainz_link::config::ButtonTable;
//! use trainz_link::hal::{MockLine, MockSink};
//! use trainz_link::traits::Level;
//! use trainz_link::ButtonMap;
//!
//! let mut buttons: ButtonMap<MockLine> =
//!     ButtonMap::from_table(&ButtonTable::control_box(), |_| MockLine::new()).unwrap();
//! buttons.begin_all().unwrap();
//!
//! // Hold down "faster"
//! buttons.find_by_command_mut('+').unwrap().line_mut().set_level(Level::High);
//!
//! let mut sink = MockSink::new();
//! assert_eq!(buttons.poll(&mut sink), Ok(1));
//! assert_eq!(sink.sent.as_slice(), &['+']);
//! ```

use core::fmt::Debug;

use heapless::String as HString;
use heapless::Vec as HVec;
use log::{debug, warn};

use crate::config::{check_unique, truncated, ButtonTable, ConfigError, MAX_BUTTONS};
use crate::traits::{CommandSink, InputLine};

/// Identifier of a digital input line (GPIO number on most boards).
pub type PinId = u8;

/// Maximum length of a custom button label.
pub const MAX_LABEL_LEN: usize = 16;

/// Label of a [`ButtonKind::Custom`] button.
pub type ButtonLabel = HString<MAX_LABEL_LEN>;

// ============================================================================
// Button Kind
// ============================================================================

/// What a button means in the control vocabulary.
///
/// The known kinds are listed explicitly; anything else is a
/// [`Custom`](Self::Custom) button carrying its own label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ButtonKind {
    /// Selects a direction of travel.
    Direction,
    /// Changes speed.
    Speed,
    /// Stops the train.
    Stop,
    /// Any other function (horn, lights, ...).
    Custom(ButtonLabel),
}

impl ButtonKind {
    /// Returns the kind as a lowercase string, or the label for custom buttons.
    ///
    /// ```
    /// use trainz_link::ButtonKind;
    ///
    /// assert_eq!(ButtonKind::Speed.as_str(), "speed");
    /// assert_eq!(ButtonKind::from_text("horn").as_str(), "horn");
    /// ```
    pub fn as_str(&self) -> &str {
        match self {
            ButtonKind::Direction => "direction",
            ButtonKind::Speed => "speed",
            ButtonKind::Stop => "stop",
            ButtonKind::Custom(label) => label.as_str(),
        }
    }

    /// Parse a kind from configuration text.
    ///
    /// Known names match case-insensitively after trimming. Anything else
    /// becomes [`Custom`](Self::Custom), truncated to [`MAX_LABEL_LEN`] bytes.
    ///
    /// ```
    /// use trainz_link::ButtonKind;
    ///
    /// assert_eq!(ButtonKind::from_text(" DIRECTION "), ButtonKind::Direction);
    /// assert!(ButtonKind::from_text("lights").is_custom());
    /// ```
    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("direction") {
            ButtonKind::Direction
        } else if s.eq_ignore_ascii_case("speed") {
            ButtonKind::Speed
        } else if s.eq_ignore_ascii_case("stop") {
            ButtonKind::Stop
        } else {
            ButtonKind::Custom(truncated(s))
        }
    }

    /// Returns true for [`ButtonKind::Custom`].
    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self, ButtonKind::Custom(_))
    }
}

// ============================================================================
// Button Spec
// ============================================================================

/// Static binding of an input line to a command character and kind.
///
/// Immutable once built. Serialized as a `(pin, command, kind)` tuple;
/// deserialization goes through [`ButtonSpec::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "(PinId, char, ButtonKind)",
        into = "(PinId, char, ButtonKind)"
    )
)]
pub struct ButtonSpec {
    pin: PinId,
    command: char,
    kind: ButtonKind,
}

impl ButtonSpec {
    /// Creates a binding.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonAsciiCommand`] if `command` is not a single ASCII byte.
    pub fn new(pin: PinId, command: char, kind: ButtonKind) -> Result<Self, ConfigError> {
        if !command.is_ascii() {
            return Err(ConfigError::NonAsciiCommand(command));
        }
        Ok(Self::known(pin, command, kind))
    }

    /// Binding from a built-in table, already known to be ASCII.
    pub(crate) const fn known(pin: PinId, command: char, kind: ButtonKind) -> Self {
        Self { pin, command, kind }
    }

    /// Input line this button is wired to.
    #[inline]
    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Character sent when the button is pressed.
    #[inline]
    pub fn command(&self) -> char {
        self.command
    }

    /// Meaning of the button.
    #[inline]
    pub fn kind(&self) -> &ButtonKind {
        &self.kind
    }
}

impl TryFrom<(PinId, char, ButtonKind)> for ButtonSpec {
    type Error = ConfigError;

    fn try_from((pin, command, kind): (PinId, char, ButtonKind)) -> Result<Self, ConfigError> {
        Self::new(pin, command, kind)
    }
}

impl From<ButtonSpec> for (PinId, char, ButtonKind) {
    fn from(spec: ButtonSpec) -> Self {
        (spec.pin, spec.command, spec.kind)
    }
}

// ============================================================================
// Button
// ============================================================================

/// A [`ButtonSpec`] bound to an input line.
#[derive(Debug)]
pub struct Button<L: InputLine> {
    spec: ButtonSpec,
    line: L,
}

impl<L: InputLine> Button<L> {
    /// Bind `spec` to `line`.
    pub fn new(spec: ButtonSpec, line: L) -> Self {
        Self { spec, line }
    }

    /// Configure the line as an input. Call once at startup.
    pub fn begin(&mut self) -> Result<(), L::Error> {
        self.line.configure_as_input()
    }

    /// Sample the line: `Ok(true)` iff it reads logical-high.
    pub fn try_is_pressed(&mut self) -> Result<bool, L::Error> {
        Ok(self.line.read_level()?.is_high())
    }

    /// Sample the line: true iff it reads logical-high.
    ///
    /// A failed read is logged and reported as released.
    pub fn is_pressed(&mut self) -> bool
    where
        L::Error: Debug,
    {
        match self.try_is_pressed() {
            Ok(pressed) => pressed,
            Err(e) => {
                warn!("button {:?} (pin {}): read failed: {:?}", self.spec.command, self.spec.pin, e);
                false
            }
        }
    }

    /// Character to transmit when a press is observed.
    #[inline]
    pub fn command_char(&self) -> char {
        self.spec.command
    }

    /// Meaning of the button.
    #[inline]
    pub fn kind(&self) -> &ButtonKind {
        &self.spec.kind
    }

    /// The binding this button was built from.
    #[inline]
    pub fn spec(&self) -> &ButtonSpec {
        &self.spec
    }

    /// The underlying input line.
    pub fn line(&self) -> &L {
        &self.line
    }

    /// Mutable access to the underlying input line.
    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Split back into binding and line.
    pub fn into_parts(self) -> (ButtonSpec, L) {
        (self.spec, self.line)
    }
}

// ============================================================================
// Button Map
// ============================================================================

/// The full set of control box buttons, in table order.
///
/// Pins and command characters are unique within a map.
#[derive(Debug)]
pub struct ButtonMap<L: InputLine, const N: usize = MAX_BUTTONS> {
    buttons: HVec<Button<L>, N>,
}

impl<L: InputLine, const N: usize> Default for ButtonMap<L, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: InputLine, const N: usize> ButtonMap<L, N> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            buttons: HVec::new(),
        }
    }

    /// Build a map from a table, creating one line per binding.
    pub fn from_table(
        table: &ButtonTable,
        mut make_line: impl FnMut(&ButtonSpec) -> L,
    ) -> Result<Self, ConfigError> {
        Self::try_from_table(table, |spec| Ok(make_line(spec)))
    }

    /// Build a map from a table with a fallible line factory.
    ///
    /// Used by board HALs where claiming a GPIO can fail.
    pub fn try_from_table<E: From<ConfigError>>(
        table: &ButtonTable,
        mut make_line: impl FnMut(&ButtonSpec) -> Result<L, E>,
    ) -> Result<Self, E> {
        let mut map = Self::new();
        for spec in table {
            let line = make_line(spec)?;
            map.push(Button::new(spec.clone(), line))?;
        }
        Ok(map)
    }

    /// Add a button.
    pub fn push(&mut self, button: Button<L>) -> Result<(), ConfigError> {
        check_unique(self.buttons.iter().map(Button::spec), button.spec())?;
        self.buttons
            .push(button)
            .map_err(|_| ConfigError::TableFull)
    }

    /// Configure every line as an input. Stops at the first failure.
    pub fn begin_all(&mut self) -> Result<(), L::Error> {
        self.buttons.iter_mut().try_for_each(Button::begin)
    }

    /// Command characters of all currently pressed buttons, in table order.
    pub fn pressed(&mut self) -> HVec<char, N>
    where
        L::Error: Debug,
    {
        let mut out = HVec::new();
        for button in self.buttons.iter_mut() {
            if button.is_pressed() {
                // cannot overflow: one entry per button
                let _ = out.push(button.command_char());
            }
        }
        out
    }

    /// Send one command character per pressed button.
    ///
    /// Returns how many characters were sent. Stops at the first sink error.
    pub fn poll<S: CommandSink>(&mut self, sink: &mut S) -> Result<usize, S::Error>
    where
        L::Error: Debug,
    {
        let pressed = self.pressed();
        for &command in &pressed {
            debug!("button {:?} pressed", command);
            sink.send_command(command)?;
        }
        Ok(pressed.len())
    }

    /// Button that sends `command`, if any.
    pub fn find_by_command(&self, command: char) -> Option<&Button<L>> {
        self.buttons.iter().find(|b| b.command_char() == command)
    }

    /// Mutable access to the button that sends `command`.
    pub fn find_by_command_mut(&mut self, command: char) -> Option<&mut Button<L>> {
        self.buttons.iter_mut().find(|b| b.command_char() == command)
    }

    /// Buttons of the given kind, in table order.
    pub fn find_by_kind<'a>(
        &'a self,
        kind: &'a ButtonKind,
    ) -> impl Iterator<Item = &'a Button<L>> + 'a {
        self.buttons.iter().filter(move |b| b.kind() == kind)
    }

    /// Buttons in table order.
    pub fn iter(&self) -> core::slice::Iter<'_, Button<L>> {
        self.buttons.iter()
    }

    /// Number of buttons.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Returns true if the map has no buttons.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
