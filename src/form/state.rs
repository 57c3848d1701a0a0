//! Form state: the values plus what the user has interacted with.

use crate::config::{ErrorDisplay, FormConfig};
use crate::error::{FieldError, RegformError};
use crate::form::preview::preview_data_url;
use crate::form::schema::{self, ValidationErrors};
use crate::form::values::{Field, FormValues, Gender, ImageFile};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A registration form being filled in.
///
/// Owned exclusively by whoever drives the form; every mutation goes through
/// `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: FormValues,
    touched: BTreeSet<Field>,
    submit_count: u32,
    preview: Option<String>,
    config: FormConfig,
}

impl FormState {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Preview data URL of the selected image, if one could be built.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Assign a text field. Gender and image have their own setters.
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> Result<(), RegformError> {
        let slot = self
            .values
            .text_mut(field)
            .ok_or(RegformError::NotATextField(field))?;
        *slot = value.into();
        Ok(())
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.values.gender = gender;
    }

    /// Select (or clear) the image and rebuild the preview.
    ///
    /// A preview that cannot be built is logged and left empty; the file is
    /// still stored so validation reports on it.
    pub async fn select_image(&mut self, image: Option<ImageFile>) {
        self.preview = match &image {
            Some(file) => match preview_data_url(file, self.config.preview_edge).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("No preview for {}: {}", file.name, e);
                    None
                }
            },
            None => None,
        };
        self.values.image = image;
    }

    /// Mark a field as interacted with (the blur event).
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub(crate) fn touch_all(&mut self) {
        self.touched.extend(Field::ALL);
    }

    pub(crate) fn record_submit(&mut self) {
        self.submit_count += 1;
        self.touch_all();
    }

    /// Current validation result over all fields.
    pub fn errors(&self) -> ValidationErrors {
        schema::validate(&self.values, &self.config)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// The error to display next to `field`, honouring the display policy.
    pub fn visible_error(&self, field: Field) -> Option<FieldError> {
        let shown = match self.config.error_display {
            ErrorDisplay::Touched => self.is_touched(field),
            ErrorDisplay::AfterSubmit => self.submit_count > 0,
        };
        if !shown {
            return None;
        }
        schema::validate_field(&self.values, field, &self.config).err()
    }

    /// Return to the initial empty form. The configuration is kept.
    pub fn reset(&mut self) {
        debug!("Resetting form");
        self.values = FormValues::default();
        self.touched.clear();
        self.submit_count = 0;
        self.preview = None;
    }

    /// Hand the current values out and reset the form.
    pub(crate) fn take_values(&mut self) -> FormValues {
        let values = std::mem::take(&mut self.values);
        self.reset();
        values
    }
}
