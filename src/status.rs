//! Last-known train status as reported by the command station.
//!
//! [`TrainStatus`] is a plain value record. The caller owns one instance for
//! the lifetime of the session and hands it to
//! [`FrameCodec::decode`](crate::FrameCodec::decode) by `&mut`; each accepted
//! frame merges into it and rejected frames leave it untouched. The actuation
//! layer reads it through a shared reference.
//!
//! # Example
//!
//! ```rust
//! use trainz_link::{Direction, FrameCodec, TrainStatus};
//!
//! let mut status = TrainStatus::new();
//! FrameCodec::new().decode("<run:d:fwd:a:40>", &mut status);
//!
//! assert_eq!(status.status.as_str(), "run");
//! assert_eq!(status.direction_hint(), Some(Direction::Forward));
//! assert_eq!(status.speed_value(), Some(40.0));
//! ```

use heapless::String as HString;

use crate::traits::Direction;

/// Maximum length in bytes of any single frame field.
pub const MAX_FIELD_LEN: usize = 32;

/// Storage for one frame field.
pub type FieldString = HString<MAX_FIELD_LEN>;

/// Copy `s` into a [`FieldString`], or `None` if it does not fit.
pub fn field_string(s: &str) -> Option<FieldString> {
    let mut out = FieldString::new();
    out.push_str(s).ok()?;
    Some(out)
}

/// Train status record.
///
/// `direction` and `speed` are kept as the raw text the frame carried. Use
/// [`direction_hint`](Self::direction_hint) and
/// [`speed_value`](Self::speed_value) to interpret them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainStatus {
    /// Free-form status label (text between `<` and the first `:`).
    pub status: FieldString,
    /// Direction text, once a direction field has been received.
    pub direction: Option<FieldString>,
    /// Speed text, once a speed field has been received.
    pub speed: Option<FieldString>,
}

impl TrainStatus {
    /// Creates an empty record: blank label, no direction, no speed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style label setter. Returns `None` on overflow.
    pub fn with_status(mut self, status: &str) -> Option<Self> {
        self.status = field_string(status)?;
        Some(self)
    }

    /// Builder-style direction setter. Returns `None` on overflow.
    pub fn with_direction(mut self, direction: &str) -> Option<Self> {
        self.direction = Some(field_string(direction)?);
        Some(self)
    }

    /// Builder-style speed setter. Returns `None` on overflow.
    pub fn with_speed(mut self, speed: &str) -> Option<Self> {
        self.speed = Some(field_string(speed)?);
        Some(self)
    }

    /// Interpret the direction text.
    ///
    /// Returns `None` if no direction was received or the text is not one of
    /// the spellings [`Direction::from_text`] knows.
    pub fn direction_hint(&self) -> Option<Direction> {
        self.direction.as_deref().and_then(Direction::from_text)
    }

    /// Interpret the speed text as a number.
    pub fn speed_value(&self) -> Option<f32> {
        self.speed.as_deref()?.trim().parse().ok()
    }

    /// Returns true if nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.status.is_empty() && self.direction.is_none() && self.speed.is_none()
    }

    /// Reset to the empty record.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let status = TrainStatus::new();
        assert!(status.is_empty());
        assert_eq!(status.status.as_str(), "");
        assert_eq!(status.direction, None);
        assert_eq!(status.speed, None);
    }

    #[test]
    fn field_string_rejects_overflow() {
        assert!(field_string("run").is_some());
        assert!(field_string(&"x".repeat(MAX_FIELD_LEN)).is_some());
        assert!(field_string(&"x".repeat(MAX_FIELD_LEN + 1)).is_none());
    }

    #[test]
    fn builders_set_fields() {
        let status = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_direction("rev"))
            .and_then(|s| s.with_speed("12"))
            .unwrap();

        assert_eq!(status.status.as_str(), "run");
        assert_eq!(status.direction.as_deref(), Some("rev"));
        assert_eq!(status.speed.as_deref(), Some("12"));
    }

    #[test]
    fn direction_hint_interprets_text() {
        let status = TrainStatus::new().with_direction("-1").unwrap();
        assert_eq!(status.direction_hint(), Some(Direction::Reverse));

        let status = TrainStatus::new().with_direction("sideways").unwrap();
        assert_eq!(status.direction_hint(), None);

        assert_eq!(TrainStatus::new().direction_hint(), None);
    }

    #[test]
    fn speed_value_parses_numbers() {
        let status = TrainStatus::new().with_speed("7").unwrap();
        assert_eq!(status.speed_value(), Some(7.0));

        let status = TrainStatus::new().with_speed("0.25").unwrap();
        assert_eq!(status.speed_value(), Some(0.25));

        let status = TrainStatus::new().with_speed("fast").unwrap();
        assert_eq!(status.speed_value(), None);
    }

    #[test]
    fn clear_resets_record() {
        let mut status = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_speed("3"))
            .unwrap();
        status.clear();
        assert!(status.is_empty());
    }
}
