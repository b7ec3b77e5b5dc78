//! UART link to the command station.
//!
//! Outbound: one byte per button press. Inbound: newline-terminated status
//! frames, read without blocking and split by a [`FrameAssembler`].
//!
//! # Wiring
//!
//! - TX → GPIO21 (command station RX)
//! - RX → GPIO20 (command station TX)
//! - GND shared

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::UartDriver;

use crate::assembler::FrameAssembler;
use crate::traits::CommandSink;

/// Command station link over an ESP-IDF UART driver.
///
/// # Example
///
/// ```ignore
/// use trainz_link::hal::esp32::{pins, Esp32Uart};
/// use trainz_link::{FrameAssembler, FrameCodec, TrainStatus};
///
/// let config = uart::config::Config::default().baudrate(Hertz(pins::UART_BAUD));
/// let driver = UartDriver::new(p.uart1, p.pins.gpio21, p.pins.gpio20,
///     Option::<AnyIOPin>::None, Option::<AnyIOPin>::None, &config)?;
/// let mut link = Esp32Uart::new(driver);
///
/// let codec = FrameCodec::new();
/// let mut status = TrainStatus::new();
/// let mut assembler = FrameAssembler::new();
/// loop {
///     buttons.poll(&mut link)?;
///     link.poll_lines(&mut assembler, |line| { codec.decode(line, &mut status); })?;
/// }
/// ```
pub struct Esp32Uart<'d> {
    uart: UartDriver<'d>,
}

impl<'d> Esp32Uart<'d> {
    /// Read chunk size per driver call.
    const READ_CHUNK: usize = 32;

    /// Wrap an already configured UART driver.
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }

    /// Drain whatever the driver has buffered into `assembler`, without blocking.
    ///
    /// Returns the number of complete lines delivered to `on_line`.
    pub fn poll_lines(
        &mut self,
        assembler: &mut FrameAssembler,
        mut on_line: impl FnMut(&str),
    ) -> Result<usize, EspError> {
        let mut buf = [0u8; Self::READ_CHUNK];
        let mut lines = 0;
        loop {
            let n = self.uart.read(&mut buf, NON_BLOCK)?;
            if n == 0 {
                return Ok(lines);
            }
            lines += assembler.feed(&buf[..n], &mut on_line);
        }
    }

    /// Release the driver.
    pub fn into_inner(self) -> UartDriver<'d> {
        self.uart
    }
}

impl CommandSink for Esp32Uart<'_> {
    type Error = EspError;

    fn send_command(&mut self, command: char) -> Result<(), EspError> {
        let mut buf = [0u8; 4];
        self.uart.write(command.encode_utf8(&mut buf).as_bytes())?;
        Ok(())
    }
}
