//! ESP32-C3 SuperMini hardware abstraction layer for the control box.
//!
//! This module provides hardware implementations for an ESP32-C3 SuperMini
//! wired as a button control box talking to the command station over UART.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Buttons**: momentary switches to GND, internal pull-ups
//! - **Link**: UART1 to the command station
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod line;
mod uart;

pub use line::{button_map, Esp32Line};
pub use uart::Esp32Uart;

/// Pin assignments for SuperMini ESP32-C3.
///
/// Button GPIOs match [`ButtonTable::control_box`](crate::config::ButtonTable::control_box).
pub mod pins {
    use crate::config::control_box;

    // =========================================================================
    // Buttons (active low, internal pull-up)
    // =========================================================================

    /// Forward button
    pub const BTN_FORWARD: i32 = control_box::FORWARD_PIN as i32;

    /// Reverse button
    pub const BTN_REVERSE: i32 = control_box::REVERSE_PIN as i32;

    /// Faster button
    pub const BTN_FASTER: i32 = control_box::FASTER_PIN as i32;

    /// Slower button
    pub const BTN_SLOWER: i32 = control_box::SLOWER_PIN as i32;

    /// Stop button
    pub const BTN_STOP: i32 = control_box::STOP_PIN as i32;

    // =========================================================================
    // UART link to the command station
    // =========================================================================

    /// UART TX (to command station RX)
    pub const UART_TX: i32 = 21;

    /// UART RX (from command station TX)
    pub const UART_RX: i32 = 20;

    /// Link baud rate
    pub const UART_BAUD: u32 = 9600;
}
