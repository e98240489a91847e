//! Checked Call Tests
//!
//! Tests for:
//! - Draining and collecting queued error codes from a poll source
//! - GlErrorCode symbolic names and hex fallback in Display
//! - checked_with verdicts: clean pass-through, stale-code tolerance,
//!   and diagnostics carrying expression + file + line

use glint::{checked_with, collect_error_codes, drain_error_codes, GlErrorCode};
use std::cell::Cell;

fn scripted(codes: Vec<u32>) -> impl FnMut() -> u32 {
    let mut queue = codes.into_iter();
    move || queue.next().unwrap_or(glow::NO_ERROR)
}

#[test]
fn drain_clean_queue_counts_zero() {
    assert_eq!(drain_error_codes(scripted(vec![])), 0);
}

#[test]
fn drain_counts_every_stale_code() {
    let stale = vec![glow::INVALID_ENUM, glow::INVALID_OPERATION];
    assert_eq!(drain_error_codes(scripted(stale)), 2);
}

#[test]
fn collect_preserves_reporting_order() {
    let codes = collect_error_codes(scripted(vec![glow::INVALID_VALUE, glow::OUT_OF_MEMORY]));

    assert_eq!(
        codes,
        vec![
            GlErrorCode(glow::INVALID_VALUE),
            GlErrorCode(glow::OUT_OF_MEMORY)
        ]
    );
}

#[test]
fn error_code_display_uses_symbolic_names() {
    assert_eq!(
        GlErrorCode(glow::INVALID_OPERATION).to_string(),
        "GL_INVALID_OPERATION (0x502)"
    );
    assert_eq!(
        GlErrorCode(glow::OUT_OF_MEMORY).name(),
        Some("GL_OUT_OF_MEMORY")
    );
}

#[test]
fn error_code_display_falls_back_to_hex() {
    let display = GlErrorCode(0x9999).to_string();

    assert!(display.contains("0x9999"));
    assert_eq!(GlErrorCode(0x9999).name(), None);
}

#[test]
fn checked_call_passes_a_clean_queue_through() {
    let result = checked_with(
        scripted(vec![]),
        "gl.clear(COLOR_BUFFER_BIT)",
        file!(),
        line!(),
        || 42,
    );

    assert_eq!(result.unwrap(), 42);
}

#[test]
fn checked_call_is_not_failed_by_stale_codes() {
    // The scripted queue is fully drained by the pre-call sweep, so the
    // invocation itself is judged against an empty queue.
    let stale = vec![glow::INVALID_OPERATION, glow::INVALID_ENUM];
    let result = checked_with(
        scripted(stale),
        "gl.viewport(0, 0, w, h)",
        file!(),
        line!(),
        || (),
    );

    assert!(result.is_ok());
}

#[test]
fn checked_call_reports_raised_codes_with_location() {
    let raised = Cell::new(false);
    let poll = || {
        if raised.get() {
            raised.set(false);
            glow::INVALID_ENUM
        } else {
            glow::NO_ERROR
        }
    };

    let result = checked_with(
        poll,
        "gl.draw_elements(TRIANGLES, 6, UNSIGNED_INT, 0)",
        "src/renderer/opengl/mod.rs",
        61,
        || raised.set(true),
    );

    let message = result.unwrap_err().to_string();
    assert!(message.contains("gl.draw_elements(TRIANGLES, 6, UNSIGNED_INT, 0)"));
    assert!(message.contains("GL_INVALID_ENUM"));
    assert!(message.contains("src/renderer/opengl/mod.rs:61"));
}

#[test]
fn checked_call_reports_every_raised_code() {
    let remaining = Cell::new(0);
    let poll = || {
        if remaining.get() > 0 {
            remaining.set(remaining.get() - 1);
            glow::INVALID_VALUE
        } else {
            glow::NO_ERROR
        }
    };

    let result = checked_with(poll, "gl.buffer_data_u8_slice(..)", file!(), line!(), || {
        remaining.set(2)
    });

    let message = result.unwrap_err().to_string();
    assert_eq!(message.matches("GL_INVALID_VALUE").count(), 2);
}
