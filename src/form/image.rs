// src/form/image.rs - Preview generation for uploaded images

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};
use crate::form::arena::ImageId;
use crate::form::model::ImageFile;
use crate::platform::PlatformBounds;

/// Turns a picked file into a `data:` URL usable as an image source
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait ImageReader: PlatformBounds {
    async fn read_data_url(&self, file: &ImageFile) -> Result<String>;
}

/// Encodes the bytes already held by the [`ImageFile`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlReader;

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl ImageReader for DataUrlReader {
    async fn read_data_url(&self, file: &ImageFile) -> Result<String> {
        if file.mime_type.trim().is_empty() {
            return Err(Error::decode(&file.name, "File has no MIME type"));
        }

        Ok(encode_data_url(&file.mime_type, &file.bytes))
    }
}

pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Fallback type for files whose content could not be identified
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// MIME type guessed from the file extension
pub fn mime_from_name(name: &str) -> &'static str {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

/// MIME type recognised from the leading bytes
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

/// A picked file whose bytes are fetched on demand. Reads are started by
/// the upload batch, after the size limit has been checked.
#[async_trait::async_trait(?Send)]
pub trait ImageSource {
    fn name(&self) -> &str;

    /// Type reported by the source, if it knows one
    fn mime_type(&self) -> Option<&str> {
        None
    }

    /// The picker already applied the `accept` filter to this file
    fn picker_filtered(&self) -> bool {
        false
    }

    /// Size in bytes when known without reading
    async fn size(&self) -> Option<u64>;

    async fn read(&self) -> Result<Arc<[u8]>>;
}

#[async_trait::async_trait(?Send)]
impl ImageSource for ImageFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        Some(&self.mime_type)
    }

    async fn size(&self) -> Option<u64> {
        Some(ImageFile::size(self))
    }

    async fn read(&self) -> Result<Arc<[u8]>> {
        Ok(Arc::clone(&self.bytes))
    }
}

/// A file from an upload batch that did not make it into the variant
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: Error,
}

/// Outcome of one `upload_images` call
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    /// Ids of the appended images, in input order
    pub appended: Vec<ImageId>,
    pub failed: Vec<UploadFailure>,
    /// The target variant was removed before the batch finished
    pub variant_missing: bool,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && !self.variant_missing
    }

    pub fn summary(&self) -> String {
        self.failed
            .iter()
            .map(|failure| format!("{}: {}", failure.file_name, failure.error.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("a.png"), "image/png");
        assert_eq!(mime_from_name("b.JPEG"), "image/jpeg");
        assert_eq!(mime_from_name("shot.jpe"), "image/jpeg");
        assert_eq!(mime_from_name("icon.svg"), "image/svg+xml");
        assert_eq!(mime_from_name("notes.txt"), "text/plain");
        assert_eq!(mime_from_name("README"), UNKNOWN_MIME_TYPE);
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A]), Some("image/png"));
        assert_eq!(sniff_mime(b"GIF89a"), Some("image/gif"));
        assert_eq!(sniff_mime(b"hello"), None);
    }

    #[tokio::test]
    async fn test_image_file_is_its_own_source() {
        let file = ImageFile::new("dot.gif", b"GIF89a".to_vec());
        assert_eq!(ImageSource::name(&file), "dot.gif");
        assert_eq!(ImageSource::mime_type(&file), Some("image/gif"));
        assert_eq!(ImageSource::size(&file).await, Some(6));
        assert_eq!(&*file.read().await.unwrap(), b"GIF89a");
        assert!(!file.picker_filtered());
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(encode_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
        assert_eq!(encode_data_url("image/gif", b""), "data:image/gif;base64,");
    }

    #[tokio::test]
    async fn test_data_url_reader() {
        let file = ImageFile::new("dot.gif", b"GIF89a".to_vec());
        let url = DataUrlReader.read_data_url(&file).await.unwrap();
        assert_eq!(url, "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_reader_rejects_missing_mime() {
        let file = ImageFile::new("blob.png", vec![0u8]).with_mime_type("");
        let result = tokio_test::block_on(DataUrlReader.read_data_url(&file));

        let error = result.unwrap_err();
        assert!(matches!(error.kind, crate::error::ErrorKind::Decode { .. }));
    }

    #[test]
    fn test_report_summary() {
        let report = UploadReport {
            appended: vec![ImageId::new()],
            failed: vec![UploadFailure {
                file_name: "big.png".to_string(),
                error: Error::validation("big.png", vec!["max_file_size".to_string()], "too large"),
            }],
            variant_missing: false,
        };

        assert!(!report.is_complete());
        assert_eq!(report.summary(), "big.png: too large");
    }
}
