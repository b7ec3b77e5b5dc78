//! Trait definitions for hardware abstraction and the outbound command link.
//!
//! These abstractions allow the control box logic to:
//! - Run on different hardware (ESP32, any `embedded-hal` pin, desktop mock)
//! - Send commands over whatever transport the board provides
//!
//! # Submodules
//!
//! - `hardware`: Digital input lines and the [`Direction`] vocabulary
//! - `link`: Outbound command characters
//!
//! # Hardware Abstraction
//!
//! - [`InputLine`]: Level sampling for a button pin
//! - [`CommandSink`]: Transmitter for button command characters

pub mod hardware;
pub mod link;

pub use hardware::*;
pub use link::*;
