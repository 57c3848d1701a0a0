//! Image encoding: [`ImageFile`] → `data:<mime>;base64,<bytes>` string.
//!
//! The whole file is read in one go and wrapped verbatim; the bytes are not
//! decoded or re-compressed, so what the backend receives is exactly what the
//! user selected. A read failure is surfaced with the original `io::Error`.

use crate::error::EncodeError;
use crate::form::values::{ImageFile, ImageSource};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// MIME type used when the handle reports none.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Encode the selected image as a base64 data URL.
///
/// Path-backed handles are read with a single `tokio::fs::read`; in-memory
/// handles complete without suspending. All-or-nothing: there are no partial
/// results and no timeout.
pub async fn encode_data_url(file: &ImageFile) -> Result<String, EncodeError> {
    let url = match &file.source {
        ImageSource::Memory(bytes) => to_data_url(&file.mime_type, bytes),
        ImageSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| EncodeError::Read {
                    path: path.clone(),
                    source,
                })?;
            to_data_url(&file.mime_type, &bytes)
        }
    };
    debug!("Encoded {} → {} bytes data URL", file.name, url.len());
    Ok(url)
}

/// Wrap raw bytes in a data URL.
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    let mime = if mime_type.is_empty() {
        FALLBACK_MIME
    } else {
        mime_type
    };
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and decoded bytes.
///
/// Returns `None` for anything that is not a `;base64` data URL or whose
/// payload is not valid base64.
pub fn split_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn ten_byte_png_round_trip() {
        let bytes: Vec<u8> = (0u8..10).collect();
        let file = ImageFile::from_bytes("tiny.png", "image/png", bytes.clone());
        let url = encode_data_url(&file).await.expect("encode should succeed");
        assert!(url.starts_with("data:image/png;base64,"), "got: {url}");

        let (mime, decoded) = split_data_url(&url).expect("valid data URL");
        assert_eq!(mime, "image/png");
        assert_eq!(decoded, bytes);
    }

    #[tokio::test]
    async fn reads_path_backed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        tokio::fs::write(&path, b"\xFF\xD8\xFFjpeg").await.unwrap();

        let file = ImageFile::from_path(&path).await.unwrap();
        let url = encode_data_url(&file).await.unwrap();
        let (mime, decoded) = split_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(decoded, b"\xFF\xD8\xFFjpeg");
    }

    #[tokio::test]
    async fn missing_file_surfaces_io_error() {
        let file = ImageFile {
            name: "gone.png".into(),
            mime_type: "image/png".into(),
            size: 10,
            source: ImageSource::Path(PathBuf::from("/definitely/not/here/gone.png")),
        };
        match encode_data_url(&file).await {
            Err(EncodeError::Read { path, source }) => {
                assert_eq!(path, PathBuf::from("/definitely/not/here/gone.png"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn empty_mime_falls_back() {
        assert_eq!(
            to_data_url("", b"hi"),
            "data:application/octet-stream;base64,aGk="
        );
    }

    #[test]
    fn split_rejects_non_base64_urls() {
        assert!(split_data_url("data:text/plain,hello").is_none());
        assert!(split_data_url("https://example.com/a.png").is_none());
        assert!(split_data_url("data:image/png;base64,!!!").is_none());
    }

    #[test]
    fn encode_blocks_on_runtime() {
        let file = ImageFile::from_bytes("a.png", "image/png", vec![1u8, 2, 3]);
        let url = tokio_test::block_on(encode_data_url(&file)).unwrap();
        assert_eq!(url, "data:image/png;base64,AQID");
    }
}
