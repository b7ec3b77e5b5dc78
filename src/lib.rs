//! # trainz-link
//!
//! The control-box side of a model train controller link: physical buttons
//! that emit single-character commands, and a decoder for the `<...>` status
//! frames the command station sends back.
//!
//! ## Features
//!
//! - **Frame codec**: Parse `<status:d:dir:a:speed>` frames into a [`TrainStatus`] record
//! - **Partial updates**: Fields absent from a frame keep their last known value
//! - **Fail closed**: Malformed frames never touch the record
//! - **Button map**: Pin, command character and logical kind per button
//! - **Hardware abstraction**: Traits for input lines and the outbound command link
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `frame` - Frame grammar, field extraction and the codec
//! - `status` - The train status record frames are decoded into
//! - `assembler` - Splits the inbound byte stream into lines
//! - `button` - Button bindings and the button map
//! - `config` - Link settings and the button table
//! - `traits` - Hardware and link abstractions
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use trainz_link::{
//!     ButtonMap, ButtonTable, FrameCodec, TrainStatus,
//!     hal::{MockLine, MockSink},
//!     traits::Level,
//! };
//!
//! // Inbound: decode a status frame
//! let codec = FrameCodec::new();
//! let mut status = TrainStatus::new();
//! assert!(codec.decode("<run:d:2:a:7>", &mut status).is_updated());
//! assert_eq!(status.status.as_str(), "run");
//! assert_eq!(status.direction.as_deref(), Some("2"));
//! assert_eq!(status.speed.as_deref(), Some("7"));
//!
//! // Outbound: poll buttons and send their commands
//! let mut buttons: ButtonMap<MockLine> =
//!     ButtonMap::from_table(&ButtonTable::control_box(), |_| MockLine::new()).unwrap();
//! buttons.begin_all().unwrap();
//! buttons.find_by_command_mut('+').unwrap().line_mut().set_level(Level::High);
//!
//! let mut sink = MockSink::new();
//! assert_eq!(buttons.poll(&mut sink), Ok(1));
//! assert_eq!(sink.sent, ['+']);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Line assembly for the inbound byte stream.
pub mod assembler;
/// Button bindings, logical kinds and the button map.
pub mod button;
/// Link settings and the button table.
pub mod config;
/// Status frame grammar and codec.
pub mod frame;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// The train status record.
pub mod status;
/// Core traits for input lines and the command link.
pub mod traits;

// Re-exports for convenience
pub use assembler::FrameAssembler;
pub use button::{Button, ButtonKind, ButtonLabel, ButtonMap, ButtonSpec, PinId};
pub use frame::{
    DecodeOutcome, EncodeError, Field, FieldsUpdated, FrameCodec, FrameString, ParsedFrame,
    RejectReason,
};
pub use status::{FieldString, TrainStatus};
pub use traits::{CommandSink, Direction, InputLine, Level};

// Config re-exports
pub use config::{ButtonTable, Config, ConfigError, LinkConfig};
