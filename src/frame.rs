//! Status frame codec.
//!
//! The command station reports train state as short text frames:
//!
//! ```text
//! <run:d:2:a:7>
//!  ^^^ ^^^ ^^^
//!   |   |   +-- speed field      (marker 'a')
//!   |   +------ direction field  (marker 'd')
//!   +---------- status label     (up to the first ':')
//! ```
//!
//! Either field may be missing, and the fields may come in any order. The
//! codec does not tokenize the frame: each field is found by searching for
//! its marker character anywhere in the line, and the first occurrence wins.
//!
//! # Grammar Constraint
//!
//! Because detection is a plain character search, a status label that
//! contains `d` or `a` is read as carrying that field. `<idle:a:4>` decodes
//! with direction `"e"`, taken from inside `"idle"`. Command stations must keep
//! marker letters out of status labels. [`FrameCodec::encode`] refuses to
//! produce such frames.
//!
//! # Merge Semantics
//!
//! [`FrameCodec::decode`] merges into a caller-owned [`TrainStatus`]: fields
//! present in the frame overwrite the record, absent fields keep their prior
//! value, and a rejected frame changes nothing. The result tells the caller
//! which of the two happened:
//!
//! ```rust
//! use trainz_link::{DecodeOutcome, FrameCodec, RejectReason, TrainStatus};
//!
//! let codec = FrameCodec::new();
//! let mut status = TrainStatus::new();
//!
//! assert!(codec.decode("<run:d:2>", &mut status).is_updated());
//! assert!(codec.decode("<run:a:7>", &mut status).is_updated());
//! assert_eq!(status.direction.as_deref(), Some("2"));
//! assert_eq!(status.speed.as_deref(), Some("7"));
//!
//! let outcome = codec.decode("run:d:5>", &mut status);
//! assert_eq!(outcome, DecodeOutcome::Unchanged(RejectReason::MissingStart));
//! assert_eq!(status.direction.as_deref(), Some("2"));
//! ```

use heapless::String as HString;
use log::{debug, trace};

use crate::config::truncated;
use crate::status::{field_string, FieldString, TrainStatus};

/// First character of every frame.
pub const FRAME_START: char = '<';

/// Last character of every frame.
pub const FRAME_END: char = '>';

/// Separates the status label from the fields, and fields from each other.
pub const FIELD_SEPARATOR: char = ':';

/// Maximum length in bytes of an encoded frame.
pub const MAX_FRAME_LEN: usize = 128;

/// Storage for one encoded frame.
pub type FrameString = HString<MAX_FRAME_LEN>;

// ============================================================================
// Fields
// ============================================================================

/// Optional fields a frame can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Direction of travel, marker `d`.
    Direction,
    /// Speed, marker `a`.
    Speed,
}

impl Field {
    /// All fields, in encoding order.
    pub const ALL: [Field; 2] = [Field::Direction, Field::Speed];

    /// Marker character introducing this field.
    #[inline]
    pub const fn marker(self) -> char {
        match self {
            Field::Direction => 'd',
            Field::Speed => 'a',
        }
    }
}

/// Extract the value of the field introduced by `marker`.
///
/// `frame` must already be trimmed and end with [`FRAME_END`]. The marker is
/// located by its first occurrence anywhere in the frame; the value starts two
/// characters later (skipping the marker and its separator) and runs to the
/// next [`FIELD_SEPARATOR`] or to the end of the frame.
///
/// Returns `None` when the marker is absent or the value would start past the
/// end of the frame. A value that starts exactly at the end is empty, not absent.
///
/// ```rust
/// use trainz_link::frame::extract_field;
///
/// assert_eq!(extract_field("<run:d:2:a:7>", 'd'), Some("2"));
/// assert_eq!(extract_field("<run:d:2:a:7>", 'a'), Some("7"));
/// assert_eq!(extract_field("<run:d:2>", 'a'), None);
/// assert_eq!(extract_field("<run:d:>", 'd'), Some(""));
/// assert_eq!(extract_field("<d>", 'd'), None);
/// ```
pub fn extract_field(frame: &str, marker: char) -> Option<&str> {
    let end = frame.strip_suffix(FRAME_END)?.len();
    let start = frame.find(marker)? + marker.len_utf8() + FIELD_SEPARATOR.len_utf8();
    if start > end {
        return None;
    }

    let rest = frame.get(start..end)?;
    match rest.find(FIELD_SEPARATOR) {
        Some(sep) => Some(&rest[..sep]),
        None => Some(rest),
    }
}

// ============================================================================
// Decode Results
// ============================================================================

/// Why a frame was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectReason {
    /// The trimmed line does not begin with [`FRAME_START`].
    MissingStart,
    /// The trimmed line does not end with [`FRAME_END`].
    MissingEnd,
    /// No [`FIELD_SEPARATOR`] terminates the status label.
    MissingSeparator,
    /// Neither a direction nor a speed value could be extracted.
    NoFields,
    /// A direction or speed value does not fit in a [`FieldString`].
    FieldTooLong,
}

impl core::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            RejectReason::MissingStart => "frame does not start with '<'",
            RejectReason::MissingEnd => "frame does not end with '>'",
            RejectReason::MissingSeparator => "status label has no ':' terminator",
            RejectReason::NoFields => "frame carries no direction or speed",
            RejectReason::FieldTooLong => "direction or speed exceeds maximum length",
        };
        f.write_str(msg)
    }
}

/// Which fields an accepted frame wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldsUpdated {
    /// The direction field was present.
    pub direction: bool,
    /// The speed field was present.
    pub speed: bool,
}

/// Result of [`FrameCodec::decode`].
///
/// Decoding never fails with an error: a frame is either merged into the
/// record or ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The frame was accepted and merged.
    Updated(FieldsUpdated),
    /// The frame was ignored; the record is exactly as before the call.
    Unchanged(RejectReason),
}

impl DecodeOutcome {
    /// Returns true if the record was modified.
    #[inline]
    pub fn is_updated(&self) -> bool {
        matches!(self, DecodeOutcome::Updated(_))
    }

    /// The reject reason, if the frame was ignored.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            DecodeOutcome::Updated(_) => None,
            DecodeOutcome::Unchanged(reason) => Some(*reason),
        }
    }
}

/// Fields extracted from one frame, not yet merged into a record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedFrame {
    /// Status label.
    pub status: FieldString,
    /// Direction value, if the frame carried one.
    pub direction: Option<FieldString>,
    /// Speed value, if the frame carried one.
    pub speed: Option<FieldString>,
}

impl ParsedFrame {
    /// Which fields this frame carries.
    pub fn fields(&self) -> FieldsUpdated {
        FieldsUpdated {
            direction: self.direction.is_some(),
            speed: self.speed.is_some(),
        }
    }

    /// Merge into `status`: label and present fields overwrite, absent fields stay.
    pub fn apply_to(self, status: &mut TrainStatus) {
        status.status = self.status;
        if let Some(direction) = self.direction {
            status.direction = Some(direction);
        }
        if let Some(speed) = self.speed {
            status.speed = Some(speed);
        }
    }
}

// ============================================================================
// Encode Errors
// ============================================================================

/// Why a [`TrainStatus`] could not be encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// A label or value contains `<`, `>` or `:`.
    ReservedCharacter,
    /// Neither direction nor speed is set, so the frame would be ignored.
    NoFields,
    /// The frame would not decode back to the same fields.
    Ambiguous,
    /// The frame does not fit in a [`FrameString`].
    Overflow,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            EncodeError::ReservedCharacter => "text contains a frame delimiter",
            EncodeError::NoFields => "status has no direction or speed",
            EncodeError::Ambiguous => "marker letter would be misread on decode",
            EncodeError::Overflow => "frame exceeds maximum length",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

// ============================================================================
// Codec
// ============================================================================

/// Encoder/decoder for status frames.
///
/// The codec is stateless; the record it updates belongs to the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Creates a codec.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Extract the label and fields from `line` without touching any record.
    ///
    /// Leading and trailing whitespace is ignored. All fields are extracted
    /// and size-checked before anything is returned, so a caller merging the
    /// result never sees a partial frame. An overlong status label is
    /// truncated to [`MAX_FIELD_LEN`](crate::status::MAX_FIELD_LEN) bytes; an
    /// overlong direction or speed rejects the frame.
    pub fn parse(&self, line: &str) -> Result<ParsedFrame, RejectReason> {
        let frame = line.trim();
        if !frame.starts_with(FRAME_START) {
            return Err(RejectReason::MissingStart);
        }
        if !frame.ends_with(FRAME_END) {
            return Err(RejectReason::MissingEnd);
        }

        let label_end = frame
            .find(FIELD_SEPARATOR)
            .ok_or(RejectReason::MissingSeparator)?;
        let label = frame
            .get(FRAME_START.len_utf8()..label_end)
            .ok_or(RejectReason::MissingSeparator)?;

        let direction = extract_field(frame, Field::Direction.marker());
        let speed = extract_field(frame, Field::Speed.marker());
        trace!("frame {:?}: direction={:?} speed={:?}", frame, direction, speed);

        if direction.is_none() && speed.is_none() {
            return Err(RejectReason::NoFields);
        }

        let to_field = |s: &str| field_string(s).ok_or(RejectReason::FieldTooLong);
        Ok(ParsedFrame {
            status: truncated(label),
            direction: direction.map(to_field).transpose()?,
            speed: speed.map(to_field).transpose()?,
        })
    }

    /// Decode `line` and merge it into `status`.
    ///
    /// On [`DecodeOutcome::Unchanged`] the record is left exactly as it was.
    pub fn decode(&self, line: &str, status: &mut TrainStatus) -> DecodeOutcome {
        match self.parse(line) {
            Ok(parsed) => {
                let fields = parsed.fields();
                parsed.apply_to(status);
                debug!("frame accepted: {:?}", status);
                DecodeOutcome::Updated(fields)
            }
            Err(reason) => {
                debug!("frame ignored ({}): {:?}", reason, line);
                DecodeOutcome::Unchanged(reason)
            }
        }
    }

    /// Encode `status` as a frame.
    ///
    /// The direction field is written before the speed field:
    ///
    /// ```rust
    /// use trainz_link::{FrameCodec, TrainStatus};
    ///
    /// let status = TrainStatus::new()
    ///     .with_status("run")
    ///     .and_then(|s| s.with_direction("2"))
    ///     .and_then(|s| s.with_speed("7"))
    ///     .unwrap();
    ///
    /// let frame = FrameCodec::new().encode(&status).unwrap();
    /// assert_eq!(frame.as_str(), "<run:d:2:a:7>");
    /// ```
    pub fn encode(&self, status: &TrainStatus) -> Result<FrameString, EncodeError> {
        let texts = [
            Some(status.status.as_str()),
            status.direction.as_deref(),
            status.speed.as_deref(),
        ];
        let reserved = |c: char| matches!(c, FRAME_START | FRAME_END | FIELD_SEPARATOR);
        if texts.iter().flatten().any(|t| t.contains(reserved)) {
            return Err(EncodeError::ReservedCharacter);
        }
        if status.direction.is_none() && status.speed.is_none() {
            return Err(EncodeError::NoFields);
        }

        let mut frame = FrameString::new();
        push(&mut frame, FRAME_START)?;
        push_str(&mut frame, &status.status)?;

        let values = [status.direction.as_deref(), status.speed.as_deref()];
        for (field, value) in Field::ALL.iter().zip(values) {
            let Some(value) = value else { continue };
            push(&mut frame, FIELD_SEPARATOR)?;
            push(&mut frame, field.marker())?;
            push(&mut frame, FIELD_SEPARATOR)?;
            push_str(&mut frame, value)?;
        }
        push(&mut frame, FRAME_END)?;

        let round_trip = self.parse(&frame).map_err(|_| EncodeError::Ambiguous)?;
        if round_trip.status != status.status
            || round_trip.direction != status.direction
            || round_trip.speed != status.speed
        {
            return Err(EncodeError::Ambiguous);
        }

        Ok(frame)
    }
}

fn push(frame: &mut FrameString, c: char) -> Result<(), EncodeError> {
    frame.push(c).map_err(|_| EncodeError::Overflow)
}

fn push_str(frame: &mut FrameString, s: &str) -> Result<(), EncodeError> {
    frame.push_str(s).map_err(|_| EncodeError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::MAX_FIELD_LEN;

    fn decode(line: &str, status: &mut TrainStatus) -> DecodeOutcome {
        FrameCodec::new().decode(line, status)
    }

    fn seeded() -> TrainStatus {
        TrainStatus::new()
            .with_status("idle")
            .and_then(|s| s.with_direction("0"))
            .and_then(|s| s.with_speed("0"))
            .unwrap()
    }

    // =========================================================================
    // extract_field tests
    // =========================================================================

    #[test]
    fn extract_single_field() {
        assert_eq!(extract_field("<run:d:2>", 'd'), Some("2"));
        assert_eq!(extract_field("<run:a:7>", 'a'), Some("7"));
    }

    #[test]
    fn extract_stops_at_next_separator() {
        assert_eq!(extract_field("<run:d:fwd:a:40>", 'd'), Some("fwd"));
        assert_eq!(extract_field("<run:a:40:d:fwd>", 'a'), Some("40"));
    }

    #[test]
    fn extract_first_occurrence_wins() {
        assert_eq!(extract_field("<run:d:1:d:2>", 'd'), Some("1"));
    }

    #[test]
    fn extract_missing_marker() {
        assert_eq!(extract_field("<run:d:2>", 'a'), None);
    }

    #[test]
    fn extract_out_of_range_is_none() {
        assert_eq!(extract_field("<d>", 'd'), None);
        assert_eq!(extract_field("<run:d>", 'd'), None);
    }

    #[test]
    fn extract_empty_value() {
        assert_eq!(extract_field("<run:d:>", 'd'), Some(""));
        assert_eq!(extract_field("<run:d::a:7>", 'd'), Some(""));
        assert_eq!(extract_field("<run:d:2:a:>", 'a'), Some(""));
    }

    #[test]
    fn extract_requires_terminator() {
        assert_eq!(extract_field("<run:d:2", 'd'), None);
    }

    #[test]
    fn extract_non_char_boundary_is_none() {
        // 'd' is followed by a two-byte character, so start lands mid-char
        assert_eq!(extract_field("<dé:x>", 'd'), None);
    }

    // =========================================================================
    // decode scenarios
    // =========================================================================

    #[test]
    fn decode_direction_only() {
        let mut status = seeded();
        let outcome = decode("<run:d:2>", &mut status);

        assert_eq!(
            outcome,
            DecodeOutcome::Updated(FieldsUpdated {
                direction: true,
                speed: false
            })
        );
        assert_eq!(status.status.as_str(), "run");
        assert_eq!(status.direction.as_deref(), Some("2"));
        assert_eq!(status.speed.as_deref(), Some("0"));
    }

    #[test]
    fn decode_speed_only() {
        let mut status = seeded();
        assert!(decode("<run:a:7>", &mut status).is_updated());
        assert_eq!(status.speed.as_deref(), Some("7"));
        assert_eq!(status.direction.as_deref(), Some("0"));
    }

    #[test]
    fn decode_both_fields() {
        let mut status = TrainStatus::new();
        assert!(decode("<run:d:2:a:7>", &mut status).is_updated());
        assert_eq!(status.direction.as_deref(), Some("2"));
        assert_eq!(status.speed.as_deref(), Some("7"));
    }

    #[test]
    fn decode_both_fields_reversed_order() {
        let mut status = TrainStatus::new();
        assert!(decode("<run:a:7:d:2>", &mut status).is_updated());
        assert_eq!(status.direction.as_deref(), Some("2"));
        assert_eq!(status.speed.as_deref(), Some("7"));
    }

    #[test]
    fn decode_trims_whitespace() {
        let mut status = TrainStatus::new();
        assert!(decode("  <run:d:2>\r\n", &mut status).is_updated());
        assert_eq!(status.direction.as_deref(), Some("2"));
    }

    // =========================================================================
    // decode rejections
    // =========================================================================

    #[test]
    fn decode_missing_start_is_noop() {
        let mut status = seeded();
        let outcome = decode("run:d:2>", &mut status);
        assert_eq!(outcome, DecodeOutcome::Unchanged(RejectReason::MissingStart));
        assert_eq!(status, seeded());
    }

    #[test]
    fn decode_missing_end_is_noop() {
        let mut status = seeded();
        let outcome = decode("<run:d:2", &mut status);
        assert_eq!(outcome, DecodeOutcome::Unchanged(RejectReason::MissingEnd));
        assert_eq!(status, seeded());
    }

    #[test]
    fn decode_empty_frame_is_noop() {
        let mut status = seeded();
        let outcome = decode("<>", &mut status);
        assert_eq!(
            outcome,
            DecodeOutcome::Unchanged(RejectReason::MissingSeparator)
        );
        assert_eq!(status, seeded());
    }

    #[test]
    fn decode_degenerate_inputs_do_not_panic() {
        let mut status = seeded();
        for line in ["", " ", "<", ">", "<<", ">>", "<:>", "<d>", "<:a>", "<run:a>"] {
            assert!(!decode(line, &mut status).is_updated(), "{:?}", line);
        }
        assert_eq!(status, seeded());
    }

    #[test]
    fn decode_lone_start_is_missing_end() {
        let mut status = TrainStatus::new();
        assert_eq!(
            decode("<", &mut status).reject_reason(),
            Some(RejectReason::MissingEnd)
        );
    }

    #[test]
    fn decode_label_without_fields_is_noop() {
        let mut status = seeded();
        let outcome = decode("<run:>", &mut status);
        assert_eq!(outcome, DecodeOutcome::Unchanged(RejectReason::NoFields));
        assert_eq!(status.status.as_str(), "idle");
    }

    #[test]
    fn decode_oversized_field_is_noop() {
        let mut status = seeded();
        let line = format!("<run:d:2:a:{}>", "9".repeat(64));
        let outcome = decode(&line, &mut status);
        assert_eq!(outcome, DecodeOutcome::Unchanged(RejectReason::FieldTooLong));
        // direction must not be half-applied
        assert_eq!(status, seeded());
    }

    #[test]
    fn decode_empty_value_is_stored() {
        let mut status = seeded();
        let outcome = decode("<run:d:2:a:>", &mut status);
        assert_eq!(
            outcome,
            DecodeOutcome::Updated(FieldsUpdated {
                direction: true,
                speed: true
            })
        );
        assert_eq!(status.direction.as_deref(), Some("2"));
        assert_eq!(status.speed.as_deref(), Some(""));
    }

    #[test]
    fn decode_empty_direction_only() {
        let mut status = seeded();
        assert!(decode("<run:d:>", &mut status).is_updated());
        assert_eq!(status.status.as_str(), "run");
        assert_eq!(status.direction.as_deref(), Some(""));
        assert_eq!(status.speed.as_deref(), Some("0"));
    }

    #[test]
    fn decode_overlong_label_is_truncated() {
        let mut status = seeded();
        let label = "x".repeat(MAX_FIELD_LEN + 10);
        let outcome = decode(&format!("<{}:a:7>", label), &mut status);

        assert!(outcome.is_updated());
        assert_eq!(status.status.as_str(), &label[..MAX_FIELD_LEN]);
        assert_eq!(status.speed.as_deref(), Some("7"));
    }

    #[test]
    fn decode_marker_in_label_is_misread() {
        // both markers are found inside "ready" first
        let mut status = TrainStatus::new();
        assert!(decode("<ready:d:2>", &mut status).is_updated());
        assert_eq!(status.status.as_str(), "ready");
        assert_eq!(status.speed.as_deref(), Some("y"));
        assert_eq!(status.direction.as_deref(), Some(""));
    }

    // =========================================================================
    // encode tests
    // =========================================================================

    #[test]
    fn encode_single_fields() {
        let codec = FrameCodec::new();
        let dir = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_direction("2"))
            .unwrap();
        let speed = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_speed("7"))
            .unwrap();

        assert_eq!(codec.encode(&dir).unwrap().as_str(), "<run:d:2>");
        assert_eq!(codec.encode(&speed).unwrap().as_str(), "<run:a:7>");
    }

    #[test]
    fn encode_rejects_reserved_characters() {
        let status = TrainStatus::new()
            .with_status("r:n")
            .and_then(|s| s.with_speed("7"))
            .unwrap();
        assert_eq!(
            FrameCodec::new().encode(&status),
            Err(EncodeError::ReservedCharacter)
        );
    }

    #[test]
    fn encode_rejects_marker_in_label() {
        let status = TrainStatus::new()
            .with_status("ready")
            .and_then(|s| s.with_speed("7"))
            .unwrap();
        assert_eq!(FrameCodec::new().encode(&status), Err(EncodeError::Ambiguous));
    }

    #[test]
    fn encode_rejects_speed_marker_in_direction() {
        let status = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_direction("back"))
            .and_then(|s| s.with_speed("7"))
            .unwrap();
        assert_eq!(FrameCodec::new().encode(&status), Err(EncodeError::Ambiguous));
    }

    #[test]
    fn encode_requires_a_field() {
        let status = TrainStatus::new().with_status("run").unwrap();
        assert_eq!(FrameCodec::new().encode(&status), Err(EncodeError::NoFields));
    }

    #[test]
    fn encode_empty_fields() {
        let codec = FrameCodec::new();
        let status = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_direction(""))
            .and_then(|s| s.with_speed("7"))
            .unwrap();

        let frame = codec.encode(&status).unwrap();
        assert_eq!(frame.as_str(), "<run:d::a:7>");

        let mut decoded = TrainStatus::new();
        codec.decode(&frame, &mut decoded);
        assert_eq!(decoded, status);
    }

    #[test]
    fn encoded_frame_decodes_to_same_record() {
        let codec = FrameCodec::new();
        let sent = TrainStatus::new()
            .with_status("run")
            .and_then(|s| s.with_direction("fwd"))
            .and_then(|s| s.with_speed("40"))
            .unwrap();

        let frame = codec.encode(&sent).unwrap();
        let mut decoded = TrainStatus::new();
        assert!(codec.decode(&frame, &mut decoded).is_updated());
        assert_eq!(decoded, sent);
    }
}
