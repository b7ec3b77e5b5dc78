//! GPIO button inputs for ESP32.
//!
//! Buttons are wired between the GPIO and GND with the internal pull-up
//! enabled, so a pressed button pulls the pin low. [`Esp32Line`] inverts this
//! so the button layer always sees "pressed" as [`Level::High`].
//!
//! # Wiring
//!
//! - Button A → GPIO2..GPIO6 (see [`pins`](super::pins))
//! - Button B → GND

use anyhow::Context;
use esp_idf_hal::gpio::{AnyIOPin, Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

use crate::button::ButtonMap;
use crate::config::ButtonTable;
use crate::traits::{InputLine, Level};

/// ESP32 GPIO configured as a button input.
///
/// # Example
///
/// ```ignore
/// use trainz_link::hal::esp32::Esp32Line;
/// use trainz_link::{Button, ButtonKind, ButtonSpec};
///
/// let peripherals = Peripherals::take()?;
/// let line = Esp32Line::new(peripherals.pins.gpio2)?;
/// let spec = ButtonSpec::new(2, 'f', ButtonKind::Direction)?;
/// let mut button = Button::new(spec, line);
/// button.begin()?;
///
/// loop {
///     if button.is_pressed() {
///         // send 'f'
///     }
/// }
/// ```
pub struct Esp32Line<'d, P>
where
    P: InputPin + OutputPin,
{
    pin: PinDriver<'d, P, Input>,
    pull: Pull,
    active_low: bool,
}

impl<'d, P> Esp32Line<'d, P>
where
    P: InputPin + OutputPin,
{
    /// Button to GND with internal pull-up (pressed = low).
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO cannot be put in input mode.
    pub fn new(pin: impl Peripheral<P = P> + 'd) -> Result<Self, EspError> {
        Self::with_pull(pin, Pull::Up, true)
    }

    /// Input with an explicit pull configuration and polarity.
    ///
    /// The pull is applied by [`InputLine::configure_as_input`].
    pub fn with_pull(
        pin: impl Peripheral<P = P> + 'd,
        pull: Pull,
        active_low: bool,
    ) -> Result<Self, EspError> {
        Ok(Self {
            pin: PinDriver::input(pin)?,
            pull,
            active_low,
        })
    }
}

impl<P> InputLine for Esp32Line<'_, P>
where
    P: InputPin + OutputPin,
{
    type Error = EspError;

    fn read_level(&mut self) -> Result<Level, EspError> {
        Ok(Level::from(self.pin.is_high() != self.active_low))
    }

    fn configure_as_input(&mut self) -> Result<(), EspError> {
        self.pin.set_pull(self.pull)
    }
}

/// Build the control box from `table`, taking one GPIO per binding in table order.
///
/// # Example
///
/// ```ignore
/// use trainz_link::config::ButtonTable;
/// use trainz_link::hal::esp32::button_map;
///
/// let p = Peripherals::take()?.pins;
/// let mut buttons = button_map(
///     &ButtonTable::control_box(),
///     [p.gpio2.into(), p.gpio3.into(), p.gpio4.into(), p.gpio5.into(), p.gpio6.into()],
/// )?;
/// buttons.begin_all()?;
/// ```
///
/// # Errors
///
/// Fails if fewer pins than bindings are supplied, a GPIO cannot be
/// configured, or the table does not fit.
pub fn button_map<'d>(
    table: &ButtonTable,
    pins: impl IntoIterator<Item = AnyIOPin>,
) -> anyhow::Result<ButtonMap<Esp32Line<'d, AnyIOPin>>> {
    let mut pins = pins.into_iter();
    ButtonMap::try_from_table(table, |spec| {
        let pin = pins
            .next()
            .with_context(|| format!("no GPIO supplied for button {:?}", spec.command()))?;
        Esp32Line::new(pin)
            .with_context(|| format!("configuring GPIO {} as input", spec.pin()))
    })
}
