//! Configuration for the registration form.
//!
//! Every constraint the schema enforces and every presentation knob lives in
//! [`FormConfig`], built via its [`FormConfigBuilder`]. The defaults reproduce
//! the registration form exactly: 2 MiB image limit, PNG/JPEG only, four
//! character passwords, errors shown on touched fields.

use crate::error::RegformError;
use serde::Serialize;

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Default upper bound (exclusive) on the image size: 2 MiB.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 2 * MIB;

/// Default minimum password length.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 4;

/// Default edge length of the square preview thumbnail, in pixels.
pub const DEFAULT_PREVIEW_EDGE: u32 = 128;

/// MIME types accepted for the image field by default.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

/// Configuration for a registration form.
///
/// Built via [`FormConfig::builder()`] or using [`FormConfig::default()`].
///
/// # Example
/// ```rust
/// use regform::FormConfig;
///
/// let config = FormConfig::builder()
///     .max_image_bytes(5 * 1024 * 1024)
///     .min_password_len(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.min_password_len, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormConfig {
    /// Images must be strictly smaller than this many bytes. Default: 2 MiB.
    pub max_image_bytes: u64,

    /// MIME types accepted for the image field. Compared case-sensitively,
    /// as the browser reports them. Default: png, jpg, jpeg.
    pub allowed_mime_types: Vec<String>,

    /// Minimum password length in UTF-16 code units. Default: 4.
    pub min_password_len: usize,

    /// Edge length of the square preview thumbnail. Default: 128.
    pub preview_edge: u32,

    /// When a failing field's message becomes visible. Default: [`ErrorDisplay::Touched`].
    pub error_display: ErrorDisplay,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
            preview_edge: DEFAULT_PREVIEW_EDGE,
            error_display: ErrorDisplay::default(),
        }
    }
}

impl FormConfig {
    /// Create a new builder for `FormConfig`.
    pub fn builder() -> FormConfigBuilder {
        FormConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether `mime` is one of the accepted image types.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime)
    }
}

/// Builder for [`FormConfig`].
#[derive(Debug)]
pub struct FormConfigBuilder {
    config: FormConfig,
}

impl FormConfigBuilder {
    pub fn max_image_bytes(mut self, bytes: u64) -> Self {
        self.config.max_image_bytes = bytes;
        self
    }

    pub fn allowed_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_mime_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_password_len(mut self, n: usize) -> Self {
        self.config.min_password_len = n;
        self
    }

    pub fn preview_edge(mut self, px: u32) -> Self {
        self.config.preview_edge = px.clamp(16, 1024);
        self
    }

    pub fn error_display(mut self, display: ErrorDisplay) -> Self {
        self.config.error_display = display;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<FormConfig, RegformError> {
        let c = &self.config;
        if c.max_image_bytes == 0 {
            return Err(RegformError::InvalidConfig(
                "Image size limit must be ≥ 1 byte".into(),
            ));
        }
        if c.allowed_mime_types.is_empty() {
            return Err(RegformError::InvalidConfig(
                "At least one image MIME type must be allowed".into(),
            ));
        }
        if let Some(bad) = c.allowed_mime_types.iter().find(|m| !m.contains('/')) {
            return Err(RegformError::InvalidConfig(format!(
                "'{bad}' is not a MIME type (expected type/subtype)"
            )));
        }
        if c.min_password_len == 0 {
            return Err(RegformError::InvalidConfig(
                "Minimum password length must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Policy deciding when a failing field's message is shown.
///
/// | Policy | Message visible when |
/// |--------|----------------------|
/// | `Touched` | the field fails and was blurred, or any submit was attempted |
/// | `AfterSubmit` | the field fails and at least one submit was attempted |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDisplay {
    #[default]
    Touched,
    AfterSubmit,
}
