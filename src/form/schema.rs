//! Validation schema: synchronous per-field constraints over [`FormValues`].
//!
//! Every field is checked on every pass. A failing field contributes exactly
//! one [`FieldError`], the first rule it breaks in this order:
//!
//! | Field | Rules |
//! |-------|-------|
//! | firstName, lastName, birthDate | required |
//! | email | required, email syntax |
//! | password | required, minimum length |
//! | image | required, size limit, MIME type |
//! | gender | none |
//!
//! Nothing here returns `Err`: failures accumulate into [`ValidationErrors`].

use crate::config::FormConfig;
use crate::error::FieldError;
use crate::form::values::{Field, FormValues, ImageFile};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Field → error map produced by [`validate`]. Iterates in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }

    fn insert(&mut self, field: Field, result: Result<(), FieldError>) {
        if let Err(e) = result {
            self.0.insert(field, e);
        }
    }
}

/// Run every field constraint and collect the failures.
pub fn validate(values: &FormValues, config: &FormConfig) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.insert(Field::FirstName, required(&values.first_name));
    errors.insert(Field::LastName, required(&values.last_name));
    errors.insert(Field::Email, check_email(&values.email));
    errors.insert(
        Field::Password,
        check_password(&values.password, config.min_password_len),
    );
    errors.insert(Field::Image, check_image(values.image.as_ref(), config));
    errors.insert(Field::BirthDate, required(&values.birth_date));
    errors
}

/// Check a single field in isolation.
pub fn validate_field(
    values: &FormValues,
    field: Field,
    config: &FormConfig,
) -> Result<(), FieldError> {
    match field {
        Field::FirstName => required(&values.first_name),
        Field::LastName => required(&values.last_name),
        Field::Email => check_email(&values.email),
        Field::Password => check_password(&values.password, config.min_password_len),
        Field::Gender => Ok(()),
        Field::Image => check_image(values.image.as_ref(), config),
        Field::BirthDate => required(&values.birth_date),
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

fn required(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(())
    }
}

fn check_email(value: &str) -> Result<(), FieldError> {
    required(value)?;
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail)
    }
}

/// Length is measured in UTF-16 code units, as a browser reports it.
fn check_password(value: &str, min: usize) -> Result<(), FieldError> {
    required(value)?;
    if value.encode_utf16().count() < min {
        return Err(FieldError::TooShort { min });
    }
    Ok(())
}

/// Check the image field: present, strictly under the size limit, and of an
/// accepted MIME type. The size rule wins when both fail.
pub fn check_image(image: Option<&ImageFile>, config: &FormConfig) -> Result<(), FieldError> {
    let image = image.ok_or(FieldError::Required)?;
    if image.size >= config.max_image_bytes {
        return Err(FieldError::TooLarge {
            max_bytes: config.max_image_bytes,
        });
    }
    if !config.accepts_mime(&image.mime_type) {
        return Err(FieldError::UnsupportedType {
            mime: image.mime_type.clone(),
        });
    }
    Ok(())
}

/// Local part, `@`, then dot-separated domain labels ending in a TLD.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
    )
    .expect("valid regex")
});

/// Whether `value` is syntactically an email address.
pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL.is_match(value)
}
