use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Which artwork slot an image is uploaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Poster,
    Banner,
}

impl ImageKind {
    pub fn upload_path(&self) -> &'static str {
        match self {
            ImageKind::Poster => "/api/images/upload/poster",
            ImageKind::Banner => "/api/images/upload/banner",
        }
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ImageKind::Poster => write!(f, "poster"),
            ImageKind::Banner => write!(f, "banner"),
        }
    }
}

impl FromStr for ImageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poster" => Ok(ImageKind::Poster),
            "banner" => Ok(ImageKind::Banner),
            other => Err(format!("unknown image kind: {}", other)),
        }
    }
}

/// `data` of a successful image upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub filename: String,
    pub original_name: Option<String>,
    pub url: String,
    pub size: Option<u64>,
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_paths() {
        assert_eq!(ImageKind::Poster.upload_path(), "/api/images/upload/poster");
        assert_eq!(ImageKind::Banner.upload_path(), "/api/images/upload/banner");
        assert_eq!("Banner".parse::<ImageKind>().unwrap(), ImageKind::Banner);
        assert!("thumbnail".parse::<ImageKind>().is_err());
    }

    #[test]
    fn test_uploaded_image_from_backend_json() {
        let json = r#"{
            "filename": "3b1f.jpg",
            "originalName": "poster.jpg",
            "url": "http://localhost:8080/3b1f.jpg",
            "size": 20480,
            "contentType": "image/jpeg"
        }"#;
        let image: UploadedImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.url, "http://localhost:8080/3b1f.jpg");
        assert_eq!(image.size, Some(20480));
    }
}
