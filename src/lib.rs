//! # regform
//!
//! The core of a registration form: field validation, an image preview, and
//! conversion of the selected image into a base64 data URL before the
//! registration payload is handed to a backend.
//!
//! ## Submit Overview
//!
//! ```text
//! FormState
//!  │
//!  ├─ 1. Validate  every field, one error per failing field
//!  ├─ 2. Reset     values, touched fields and preview back to empty
//!  ├─ 3. Encode    image file → data:<mime>;base64,…
//!  └─ 4. Hand off  EncodedPayload → Transmitter (logs by default)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use regform::{submit, Field, FormConfig, FormState, ImageFile, LogTransmitter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut form = FormState::new(FormConfig::default());
//!     form.set_text(Field::FirstName, "Ana")?;
//!     form.set_text(Field::LastName, "Ivanova")?;
//!     form.set_text(Field::Email, "a@b.com")?;
//!     form.set_text(Field::Password, "abcd")?;
//!     form.set_text(Field::BirthDate, "2000-01-01")?;
//!     form.select_image(Some(ImageFile::from_path("avatar.png").await?)).await;
//!
//!     let payload = submit(&mut form, &LogTransmitter).await.into_result()?;
//!     println!("{}", serde_json::to_string_pretty(&payload)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `regform` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod form;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ErrorDisplay, FormConfig, FormConfigBuilder};
pub use error::{EncodeError, FieldError, PreviewError, RegformError};
pub use form::encode::encode_data_url;
pub use form::{
    submit, EncodedPayload, Field, FormState, FormValues, Gender, ImageFile, ImageSource,
    LogTransmitter, SubmitOutcome, Transmitter, ValidationErrors,
};
