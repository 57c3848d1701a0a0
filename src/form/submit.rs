//! Submission: validate, reset, encode the image, hand the payload over.
//!
//! ```text
//! submit ──▶ validate ──▶ reset form ──▶ encode image ──▶ Transmitter::send
//!              │ fail                        │ fail              │ fail
//!              ▼                             ▼                   ▼
//!           Invalid                    EncodeFailed        TransmitFailed
//! ```
//!
//! The form is reset as soon as validation passes, before the encode is
//! awaited, so the outcome of the encode never leaves stale values on screen.
//! A second submission may therefore start while a previous payload is still
//! encoding; nothing serialises the two.

use crate::error::{EncodeError, RegformError};
use crate::form::encode::encode_data_url;
use crate::form::schema::{self, ValidationErrors};
use crate::form::state::FormState;
use crate::form::values::{FormValues, Gender, ImageFile};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// The registration as it would be sent to the backend: every field, with the
/// image replaced by its data URL.
///
/// Only [`submit`] can build one, and only from values that passed validation.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPayload {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    gender: Gender,
    image: String,
    birth_date: String,
}

impl EncodedPayload {
    fn compose(validated: ValidatedValues, image: String) -> Self {
        let ValidatedValues { values, .. } = validated;
        Self {
            first_name: values.first_name,
            last_name: values.last_name,
            email: values.email,
            password: values.password,
            gender: values.gender,
            image,
            birth_date: values.birth_date,
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// The image as a `data:<mime>;base64,...` URL.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("gender", &self.gender)
            .field("image", &format_args!("<{} bytes data URL>", self.image.len()))
            .field("birth_date", &self.birth_date)
            .finish()
    }
}

/// Values that passed every constraint, with the image split out.
struct ValidatedValues {
    values: FormValues,
    image: ImageFile,
}

/// Validate the form and, if it passes, take its values and reset it.
fn take_validated(form: &mut FormState) -> Result<ValidatedValues, ValidationErrors> {
    let errors = form.errors();
    if !errors.is_empty() {
        return Err(errors);
    }
    let mut values = form.take_values();
    match values.image.take() {
        Some(image) => Ok(ValidatedValues { values, image }),
        None => Err(schema::validate(&values, form.config())),
    }
}

// ── Transmission ─────────────────────────────────────────────────────────────

/// Receives the composed payload, e.g. to post it to a registration endpoint.
#[async_trait]
pub trait Transmitter: Send + Sync {
    async fn send(&self, payload: &EncodedPayload) -> Result<(), RegformError>;
}

/// Transmitter that only logs the payload. Nothing leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransmitter;

#[async_trait]
impl Transmitter for LogTransmitter {
    async fn send(&self, payload: &EncodedPayload) -> Result<(), RegformError> {
        info!(
            "Registration ready for {} {} <{}> ({} bytes image)",
            payload.first_name,
            payload.last_name,
            payload.email,
            payload.image.len()
        );
        debug!("Payload: {:?}", payload);
        Ok(())
    }
}

// ── Submit ───────────────────────────────────────────────────────────────────

/// Result of one submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// At least one field failed; the form keeps its values.
    Invalid(ValidationErrors),
    /// The image could not be read. The form has already been reset.
    EncodeFailed(EncodeError),
    /// The payload was composed but the transmitter rejected it.
    TransmitFailed {
        payload: EncodedPayload,
        error: RegformError,
    },
    /// The payload was composed and handed over.
    Submitted(EncodedPayload),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }

    /// The composed payload, if the submission got that far.
    pub fn payload(&self) -> Option<&EncodedPayload> {
        match self {
            SubmitOutcome::Submitted(p) | SubmitOutcome::TransmitFailed { payload: p, .. } => {
                Some(p)
            }
            _ => None,
        }
    }

    /// Treat anything but a completed submission as an error.
    pub fn into_result(self) -> Result<EncodedPayload, RegformError> {
        match self {
            SubmitOutcome::Submitted(p) => Ok(p),
            SubmitOutcome::Invalid(errors) => Err(RegformError::Validation(errors)),
            SubmitOutcome::EncodeFailed(e) => Err(RegformError::Encode(e)),
            SubmitOutcome::TransmitFailed { error, .. } => Err(error),
        }
    }
}

/// Submit the form.
///
/// Marks every field touched, validates, and on success resets the form,
/// encodes the image and hands the [`EncodedPayload`] to `transmitter`.
/// Failures after validation are returned as outcomes; the form stays reset.
pub async fn submit(form: &mut FormState, transmitter: &dyn Transmitter) -> SubmitOutcome {
    form.record_submit();

    let validated = match take_validated(form) {
        Ok(v) => v,
        Err(errors) => {
            info!("Submission blocked: {} invalid field(s)", errors.len());
            return SubmitOutcome::Invalid(errors);
        }
    };

    let image = match encode_data_url(&validated.image).await {
        Ok(url) => url,
        Err(e) => {
            warn!("Image encoding failed: {}", e);
            return SubmitOutcome::EncodeFailed(e);
        }
    };

    let payload = EncodedPayload::compose(validated, image);
    match transmitter.send(&payload).await {
        Ok(()) => SubmitOutcome::Submitted(payload),
        Err(error) => {
            warn!("Transmission failed: {}", error);
            SubmitOutcome::TransmitFailed { payload, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::values::Field;

    fn filled_form() -> FormState {
        let mut form = FormState::default();
        form.set_text(Field::FirstName, "Ana").unwrap();
        form.set_text(Field::LastName, "Ivanova").unwrap();
        form.set_text(Field::Email, "a@b.com").unwrap();
        form.set_text(Field::Password, "abcd").unwrap();
        form.set_text(Field::BirthDate, "2000-01-01").unwrap();
        form
    }

    #[tokio::test]
    async fn payload_debug_redacts_secrets() {
        let mut form = filled_form();
        form.select_image(Some(ImageFile::from_bytes("a.png", "image/png", vec![7u8; 10])))
            .await;
        let payload = submit(&mut form, &LogTransmitter).await.into_result().unwrap();
        let dbg = format!("{payload:?}");
        assert!(!dbg.contains("abcd"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("base64"));
    }

    #[tokio::test]
    async fn payload_serialises_camel_case() {
        let mut form = filled_form();
        form.set_gender(Gender::Female);
        form.select_image(Some(ImageFile::from_bytes("a.png", "image/png", vec![1u8, 2, 3])))
            .await;
        let payload = submit(&mut form, &LogTransmitter).await.into_result().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["firstName"], "Ana");
        assert_eq!(json["birthDate"], "2000-01-01");
        assert_eq!(json["gender"], "Female");
        assert_eq!(json["image"], "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn invalid_submit_keeps_values_and_touches_everything() {
        let mut form = filled_form();
        let outcome = submit(&mut form, &LogTransmitter).await;
        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Image]);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(form.values().first_name, "Ana");
        assert_eq!(form.submit_count(), 1);
        assert!(Field::ALL.iter().all(|f| form.is_touched(*f)));
    }

    #[tokio::test]
    async fn into_result_maps_invalid() {
        let mut form = FormState::default();
        let err = submit(&mut form, &LogTransmitter)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, RegformError::Validation(ref e) if e.len() == 6));
        assert!(err.to_string().starts_with("6 field(s) failed validation"));
    }
}
