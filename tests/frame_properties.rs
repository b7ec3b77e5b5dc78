//! Property-based tests for the frame codec
//!
//! These tests verify the decoding invariants:
//!
//! 1. **Order independence**: both fields are extracted whatever their order
//! 2. **Fail closed**: a frame missing a delimiter never mutates the record
//! 3. **Idempotence**: decoding a frame twice equals decoding it once
//! 4. **Field independence**: an absent field keeps its prior value
//!
//! Labels and values avoid the marker letters and the delimiters, which the
//! grammar cannot tell apart from real markers.

use proptest::prelude::*;
use trainz_link::{FrameCodec, TrainStatus};

fn seeded() -> TrainStatus {
    TrainStatus::new()
        .with_status("idle")
        .and_then(|s| s.with_direction("0"))
        .and_then(|s| s.with_speed("0"))
        .unwrap()
}

fn label() -> impl Strategy<Value = String> {
    "[bcefghijklmnopqrstuvwxyz]{0,12}"
}

fn value() -> impl Strategy<Value = String> {
    "[0-9bcefA-Z+-]{1,16}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_both_fields_any_order(
        label in label(),
        direction in value(),
        speed in value(),
        swapped in any::<bool>(),
    ) {
        let frame = if swapped {
            format!("<{label}:a:{speed}:d:{direction}>")
        } else {
            format!("<{label}:d:{direction}:a:{speed}>")
        };

        let mut status = seeded();
        prop_assert!(FrameCodec::new().decode(&frame, &mut status).is_updated());

        prop_assert_eq!(status.status.as_str(), label.as_str());
        prop_assert_eq!(status.direction.as_deref(), Some(direction.as_str()));
        prop_assert_eq!(status.speed.as_deref(), Some(speed.as_str()));
    }

    #[test]
    fn prop_missing_delimiter_is_noop(
        label in label(),
        direction in value(),
        cut in 0..3u8,
    ) {
        let frame = format!("<{label}:d:{direction}>");
        let broken = match cut {
            0 => &frame[1..],
            1 => &frame[..frame.len() - 1],
            _ => &frame[1..frame.len() - 1],
        };

        let mut status = seeded();
        prop_assert!(!FrameCodec::new().decode(broken, &mut status).is_updated());
        prop_assert_eq!(status, seeded());
    }

    #[test]
    fn prop_rejected_input_never_mutates(line in "\\PC{0,40}") {
        let mut status = seeded();
        if !FrameCodec::new().decode(&line, &mut status).is_updated() {
            prop_assert_eq!(status, seeded());
        }
    }

    #[test]
    fn prop_decode_is_idempotent(
        label in label(),
        direction in proptest::option::of(value()),
        speed in value(),
    ) {
        let frame = match &direction {
            Some(d) => format!("<{label}:d:{d}:a:{speed}>"),
            None => format!("<{label}:a:{speed}>"),
        };
        let codec = FrameCodec::new();

        let mut once = seeded();
        codec.decode(&frame, &mut once);

        let mut twice = seeded();
        codec.decode(&frame, &mut twice);
        codec.decode(&frame, &mut twice);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_absent_field_keeps_prior_value(
        label in label(),
        new_value in value(),
        prior in value(),
        direction_only in any::<bool>(),
    ) {
        let mut status = TrainStatus::new()
            .with_direction(&prior)
            .and_then(|s| s.with_speed(&prior))
            .unwrap();

        let codec = FrameCodec::new();
        if direction_only {
            codec.decode(&format!("<{label}:d:{new_value}>"), &mut status);
            prop_assert_eq!(status.direction.as_deref(), Some(new_value.as_str()));
            prop_assert_eq!(status.speed.as_deref(), Some(prior.as_str()));
        } else {
            codec.decode(&format!("<{label}:a:{new_value}>"), &mut status);
            prop_assert_eq!(status.speed.as_deref(), Some(new_value.as_str()));
            prop_assert_eq!(status.direction.as_deref(), Some(prior.as_str()));
        }
    }
}
