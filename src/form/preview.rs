//! Preview: a small square thumbnail of the selected image, as a PNG data URL.
//!
//! The form shows the preview as soon as a file is chosen, before any
//! validation. Decoding and resizing are CPU-bound, so they run on
//! `spawn_blocking` rather than on the async worker threads.

use crate::error::PreviewError;
use crate::form::encode::to_data_url;
use crate::form::values::{ImageFile, ImageSource};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Build a `edge` × `edge` cover-cropped thumbnail of `file` as a PNG data URL.
pub async fn preview_data_url(file: &ImageFile, edge: u32) -> Result<String, PreviewError> {
    let bytes: Arc<[u8]> = match &file.source {
        ImageSource::Memory(bytes) => Arc::clone(bytes),
        ImageSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|source| PreviewError::Read {
                path: path.clone(),
                source,
            })?
            .into(),
    };
    let name = file.name.clone();

    let png = tokio::task::spawn_blocking(move || thumbnail_png(&name, &bytes, edge))
        .await
        .map_err(|e| PreviewError::Internal(format!("Preview task panicked: {}", e)))??;

    debug!("Preview for {}: {} bytes PNG", file.name, png.len());
    Ok(to_data_url("image/png", &png))
}

/// Decode, cover-crop to a square and re-encode as PNG.
fn thumbnail_png(name: &str, bytes: &[u8], edge: u32) -> Result<Vec<u8>, PreviewError> {
    let decode = |source: image::ImageError| PreviewError::Decode {
        name: name.to_string(),
        source,
    };
    let img = image::load_from_memory(bytes).map_err(decode)?;
    let thumb: DynamicImage = img.resize_to_fill(edge, edge, FilterType::Triangle);

    let mut buf = Vec::new();
    thumb
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(decode)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::encode::split_data_url;
    use image::{Rgba, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode should succeed");
        buf
    }

    #[tokio::test]
    async fn preview_is_square_png() {
        let file = ImageFile::from_bytes("wide.png", "image/png", png_bytes(300, 150));
        let url = preview_data_url(&file, 128).await.expect("preview");
        let (mime, bytes) = split_data_url(&url).expect("data URL");
        assert_eq!(mime, "image/png");

        let thumb = image::load_from_memory(&bytes).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (128, 128));
    }

    #[tokio::test]
    async fn garbage_fails_to_decode() {
        let file = ImageFile::from_bytes("junk.png", "image/png", b"not an image".to_vec());
        let err = preview_data_url(&file, 128).await.unwrap_err();
        assert!(matches!(err, PreviewError::Decode { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn missing_file_fails_to_read() {
        let file = ImageFile {
            name: "gone.png".into(),
            mime_type: "image/png".into(),
            size: 1,
            source: ImageSource::Path("/definitely/not/here.png".into()),
        };
        let err = preview_data_url(&file, 64).await.unwrap_err();
        assert!(matches!(err, PreviewError::Read { .. }), "got: {err:?}");
    }
}
