//! [`InputLine`] adapter for `embedded-hal` digital inputs.
//!
//! Any board crate implementing `embedded_hal::digital::InputPin` (1.0) can
//! drive the button layer through [`EhLine`].

use embedded_hal::digital::InputPin;

use crate::traits::{InputLine, Level};

/// Wraps an `embedded-hal` input pin.
///
/// Set `active_low` for buttons wired to ground with a pull-up, so that a
/// pressed button still reads as [`Level::High`].
///
/// # Example
///
/// ```ignore
/// use trainz_link::hal::EhLine;
///
/// let line = EhLine::active_low(board_pin);
/// ```
#[derive(Debug)]
pub struct EhLine<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> EhLine<P> {
    /// Line that reads high when the pin is high.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Line that reads high when the pin is low.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> InputLine for EhLine<P> {
    type Error = P::Error;

    fn read_level(&mut self) -> Result<Level, Self::Error> {
        let high = self.pin.is_high()?;
        Ok(Level::from(high != self.active_low))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct FakePin(bool);

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0)
        }
    }

    #[test]
    fn active_high() {
        assert_eq!(EhLine::new(FakePin(true)).read_level(), Ok(Level::High));
        assert_eq!(EhLine::new(FakePin(false)).read_level(), Ok(Level::Low));
    }

    #[test]
    fn active_low_inverts() {
        assert_eq!(EhLine::active_low(FakePin(false)).read_level(), Ok(Level::High));
        assert_eq!(EhLine::active_low(FakePin(true)).read_level(), Ok(Level::Low));
    }
}
