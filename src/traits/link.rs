//! Outbound side of the serial-like control link.
//!
//! Button presses leave the control box as single ASCII characters, one per
//! press, with no framing and no acknowledgment:
//!
//! ```text
//! press FORWARD  ->  'f'
//! press FASTER   ->  '+'
//! ```
//!
//! The inbound side (status frames) is plain text handled by
//! [`FrameAssembler`](crate::FrameAssembler) and [`FrameCodec`](crate::FrameCodec),
//! so it needs no trait of its own.

/// Sink for button command characters.
///
/// Typically a UART transmitter. The sink should not buffer indefinitely:
/// a command is only meaningful close to the press that produced it.
///
/// # Example
///
/// ```rust
/// use trainz_link::traits::CommandSink;
/// use trainz_link::hal::MockSink;
///
/// let mut sink = MockSink::new();
/// sink.send_command('f').unwrap();
/// assert_eq!(sink.sent.as_slice(), &['f']);
/// ```
pub trait CommandSink {
    /// Error type for transmit failures.
    type Error;

    /// Transmit one command character.
    fn send_command(&mut self, command: char) -> Result<(), Self::Error>;
}

impl<T: CommandSink + ?Sized> CommandSink for &mut T {
    type Error = T::Error;

    fn send_command(&mut self, command: char) -> Result<(), Self::Error> {
        (**self).send_command(command)
    }
}
