//! Form values, field identifiers and the selected image handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The seven fields of the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    Gender,
    Image,
    BirthDate,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Password,
        Field::Gender,
        Field::Image,
        Field::BirthDate,
    ];

    /// The key this field is reported under in error maps and payloads.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Password => "password",
            Field::Gender => "gender",
            Field::Image => "image",
            Field::BirthDate => "birthDate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gender selector. `Unspecified` is the "Select gender" placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Male,
    Female,
}

/// Where the bytes of an [`ImageFile`] live.
#[derive(Clone)]
pub enum ImageSource {
    /// A file on disk, read lazily by the encoder.
    Path(PathBuf),
    /// Bytes already in memory (e.g. received from an upload).
    Memory(Arc<[u8]>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            ImageSource::Memory(b) => write!(f, "Memory(<{} bytes>)", b.len()),
        }
    }
}

/// A selected image: the file handle the form validates and encodes.
///
/// `size` and `mime_type` are attributes of the handle, known without reading
/// the content, the same way a browser `File` reports `size` and `type`.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub source: ImageSource,
}

impl ImageFile {
    /// Wrap in-memory bytes. The size is taken from the buffer.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: ImageSource::Memory(bytes),
        }
    }

    /// Open a handle on a file on disk.
    ///
    /// Stats the file for its size and sniffs the MIME type from the leading
    /// bytes, falling back to the extension. An unrecognised file gets an
    /// empty MIME type, which the schema then rejects.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        let head = read_head(path).await?;
        let mime_type = sniff_mime(&head, path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(
            "Opened image {} ({} bytes, type {:?})",
            path.display(),
            meta.len(),
            mime_type
        );

        Ok(Self {
            name,
            mime_type,
            size: meta.len(),
            source: ImageSource::Path(path.to_path_buf()),
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ImageSource::Path(p) => Some(p),
            ImageSource::Memory(_) => None,
        }
    }
}

/// Read up to the first 16 bytes of a file for format sniffing.
async fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    use tokio::io::AsyncReadExt;

    let file = tokio::fs::File::open(path).await?;
    let mut head = Vec::with_capacity(16);
    file.take(16).read_to_end(&mut head).await?;
    Ok(head)
}

/// Guess a MIME type from magic bytes, then from the file extension.
pub fn sniff_mime(head: &[u8], path: &Path) -> String {
    image::guess_format(head)
        .ok()
        .or_else(|| image::ImageFormat::from_path(path).ok())
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_default()
}

/// The values of a registration form. `Default` is the empty form.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub image: Option<ImageFile>,
    pub birth_date: String,
}

impl FormValues {
    /// Whether every field holds its initial value.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.email.is_empty()
            && self.password.is_empty()
            && self.gender == Gender::Unspecified
            && self.image.is_none()
            && self.birth_date.is_empty()
    }

    /// Mutable access to a text field, `None` for gender and image.
    pub(crate) fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FirstName => Some(&mut self.first_name),
            Field::LastName => Some(&mut self.last_name),
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::BirthDate => Some(&mut self.birth_date),
            Field::Gender | Field::Image => None,
        }
    }
}
