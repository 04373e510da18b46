use nicephim_core::constants::{IMAGE_TOO_LARGE, INVALID_IMAGE_FILE, MAX_IMAGE_SIZE_BYTES};
use nicephim_core::models::{Envelope, ImageKind, UploadedImage};
use nicephim_core::ClientError;
use std::path::Path;

use crate::{transport_error, ApiClient};

/// Check an artwork file before upload: image content type, at most 10 MiB.
/// Returns the guessed content type.
pub fn check_image_file(path: &Path, size: u64) -> Result<String, ClientError> {
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(ClientError::InvalidInput(INVALID_IMAGE_FILE.to_string()));
    }
    if size > MAX_IMAGE_SIZE_BYTES {
        return Err(ClientError::InvalidInput(IMAGE_TOO_LARGE.to_string()));
    }
    Ok(content_type)
}

impl ApiClient {
    /// Upload a poster or banner from a local file path.
    #[tracing::instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub async fn upload_image(
        &self,
        kind: ImageKind,
        file_path: impl AsRef<Path>,
    ) -> Result<UploadedImage, ClientError> {
        let path = file_path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let content_type = check_image_file(path, metadata.len())?;
        let buffer = tokio::fs::read(path).await?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();

        let part = reqwest::multipart::Part::bytes(buffer)
            .file_name(filename)
            .mime_str(&content_type)
            .map_err(transport_error)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let envelope: Envelope<UploadedImage> =
            self.post_multipart(kind.upload_path(), form).await?;
        let image = envelope.into_data()?;
        tracing::info!(%kind, url = %image.url, "Image uploaded");
        Ok(image)
    }
}
