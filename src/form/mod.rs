//! The registration form and its stages.
//!
//! ## Data Flow
//!
//! ```text
//! select image ──▶ preview            (thumbnail for display)
//! submit ──▶ schema ──▶ encode ──▶ Transmitter
//!           (validate)  (data URL)  (log / backend)
//! ```
//!
//! 1. [`values`]  — the field values and the selected image handle
//! 2. [`schema`]  — synchronous per-field constraints; failures accumulate
//! 3. [`preview`] — square PNG thumbnail built when an image is chosen
//! 4. [`encode`]  — reads the image and wraps it as a base64 data URL; the
//!    only stage with file I/O on the submit path
//! 5. [`state`]   — values plus touched fields, submit count and preview
//! 6. [`submit`]  — ties the stages together for one submit attempt

pub mod encode;
pub mod preview;
pub mod schema;
pub mod state;
pub mod submit;
pub mod values;

pub use schema::ValidationErrors;
pub use state::FormState;
pub use submit::{submit, EncodedPayload, LogTransmitter, SubmitOutcome, Transmitter};
pub use values::{Field, FormValues, Gender, ImageFile, ImageSource};
