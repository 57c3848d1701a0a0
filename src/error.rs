//! Error types for the regform library.
//!
//! Failures come in two flavours:
//!
//! * [`FieldError`] — **Non-fatal**: one field of the form does not satisfy
//!   its constraint. Field errors are collected into
//!   [`crate::form::ValidationErrors`] and never returned as `Err`; the user
//!   fixes the field and submits again.
//!
//! * [`RegformError`] — **Fatal** for the current operation: a bad
//!   configuration, a file that could not be read while encoding, or a
//!   transmitter that refused the payload.
//!
//! [`EncodeError`] and [`PreviewError`] are the narrower errors of the two
//! image stages; both convert into [`RegformError`].

use crate::form::{Field, ValidationErrors};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the regform library.
#[derive(Debug, Error)]
pub enum RegformError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Form errors ───────────────────────────────────────────────────────
    /// Submission was blocked because at least one field failed validation.
    ///
    /// Returned by [`crate::form::SubmitOutcome::into_result`].
    #[error("{} field(s) failed validation: {}", .0.len(), summarize(.0))]
    Validation(ValidationErrors),

    /// A text value was assigned to a field that does not hold text.
    #[error("Field '{}' does not hold text", .0.name())]
    NotATextField(Field),

    // ── Image errors ──────────────────────────────────────────────────────
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    /// The transmission collaborator rejected the payload.
    #[error("Failed to transmit registration: {0}")]
    Transmit(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of the data-URL encoder.
///
/// The underlying read error is carried unchanged in `source`.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to read image '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while building the thumbnail preview of a selected image.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to read image '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Preview task failed: {0}")]
    Internal(String),
}

/// A non-fatal validation failure for a single field.
///
/// The `Display` text is the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("Field is required")]
    Required,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Wrong Size under {}", size_limit(.max_bytes))]
    TooLarge { max_bytes: u64 },

    #[error("Wrong file Type")]
    UnsupportedType { mime: String },
}

/// `field: message` pairs joined for a one-line error.
fn summarize(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, e)| format!("{field}: {e}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a byte limit as `NMB` when it is whole mebibytes, else as bytes.
fn size_limit(bytes: &u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if *bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_display() {
        assert_eq!(FieldError::Required.to_string(), "Field is required");
    }

    #[test]
    fn too_large_display_uses_mebibytes() {
        let e = FieldError::TooLarge {
            max_bytes: 2 * 1024 * 1024,
        };
        assert_eq!(e.to_string(), "Wrong Size under 2MB");
    }

    #[test]
    fn too_large_display_keeps_odd_limits_exact() {
        let e = FieldError::TooLarge {
            max_bytes: 3 * 1024 * 1024 + 1,
        };
        assert_eq!(e.to_string(), "Wrong Size under 3145729 bytes");
        let e = FieldError::TooLarge { max_bytes: 16 };
        assert_eq!(e.to_string(), "Wrong Size under 16 bytes");
    }

    #[test]
    fn too_short_display() {
        let e = FieldError::TooShort { min: 4 };
        assert_eq!(e.to_string(), "password must be at least 4 characters");
    }

    #[test]
    fn encode_error_keeps_source() {
        use std::error::Error as _;
        let e = EncodeError::Read {
            path: PathBuf::from("/tmp/missing.png"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(e.to_string().contains("missing.png"));
        let source = e.source().expect("source is kept");
        let io = source
            .downcast_ref::<std::io::Error>()
            .expect("source is an io::Error");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn not_a_text_field_display() {
        let e = RegformError::NotATextField(Field::Image);
        assert!(e.to_string().contains("image"), "got: {e}");
    }
}
