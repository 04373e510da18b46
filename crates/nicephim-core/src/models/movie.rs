use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::envelope::Pagination;
use super::genre::GenreResponse;

/// Movie as returned by `/api/admin/movies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub movie_id: Uuid,
    pub title: String,
    pub alias_title: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<i16>,
    pub age_rating: Option<String>,
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub is_series: bool,
    pub poster_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub genres: Vec<GenreResponse>,
    pub video_id: Option<String>,
    pub hls_url: Option<String>,
    pub video_status: Option<String>,
}

impl MovieResponse {
    /// A movie is watchable once its video finished transcoding.
    pub fn has_playable_video(&self) -> bool {
        self.hls_url.is_some()
            && self
                .video_status
                .as_deref()
                .map(|s| s.eq_ignore_ascii_case("READY"))
                .unwrap_or(false)
    }
}

/// One page of `GET /api/admin/movies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePage {
    pub movies: Vec<MovieResponse>,
    pub pagination: Option<Pagination>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1888, max = 2100))]
    pub release_year: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub imdb_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_series: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub genre_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hls_url: Option<String>,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1888, max = 2100))]
    pub release_year: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub imdb_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_series: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hls_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_status: Option<String>,
}

impl UpdateMovieRequest {
    /// Attach a finished upload to an existing movie.
    pub fn with_video(video_id: impl Into<String>, hls_url: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            hls_url: Some(hls_url.into()),
            video_status: Some("READY".to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_response_from_backend_json() {
        let json = r#"{
            "movieId": "5f1c2b9e-8a4b-4c7e-9a51-2f1e6c7d8b90",
            "title": "Hai Phượng",
            "aliasTitle": "Furie",
            "releaseYear": 2019,
            "imdbRating": 6.6,
            "isSeries": false,
            "createdAt": "2024-05-01T10:00:00+07:00",
            "genres": [{"genreId": "0e9d1c2b-3a4f-4b5c-8d7e-6f5a4b3c2d1e", "name": "Hành động"}],
            "videoId": "v1",
            "hlsUrl": "/videos/v1/master.m3u8",
            "videoStatus": "READY"
        }"#;
        let movie: MovieResponse = serde_json::from_str(json).unwrap();
        assert_eq!(movie.title, "Hai Phượng");
        assert_eq!(movie.release_year, Some(2019));
        assert_eq!(movie.genres.len(), 1);
        assert_eq!(movie.genres[0].name, "Hành động");
        assert!(movie.has_playable_video());
        assert_eq!(
            movie.created_at.unwrap().to_rfc3339(),
            "2024-05-01T03:00:00+00:00"
        );
    }

    #[test]
    fn test_movie_without_video_is_not_playable() {
        let json = r#"{"movieId":"5f1c2b9e-8a4b-4c7e-9a51-2f1e6c7d8b90","title":"Mắt Biếc"}"#;
        let movie: MovieResponse = serde_json::from_str(json).unwrap();
        assert!(!movie.is_series);
        assert!(movie.genres.is_empty());
        assert!(!movie.has_playable_video());
    }

    #[test]
    fn test_create_request_skips_empty_fields() {
        let req = CreateMovieRequest {
            title: "Bố Già".to_string(),
            release_year: Some(2021),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["title"], "Bố Già");
        assert_eq!(value["releaseYear"], 2021);
        assert!(value.get("genreIds").is_none());
        assert!(value.get("posterUrl").is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let blank = CreateMovieRequest {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let bad_rating = CreateMovieRequest {
            title: "Lật Mặt".to_string(),
            imdb_rating: Some(11.0),
            ..Default::default()
        };
        assert!(bad_rating.validate().is_err());

        let ok = CreateMovieRequest {
            title: "Lật Mặt".to_string(),
            imdb_rating: Some(7.2),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_blank_title() {
        let blank = UpdateMovieRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let renamed = UpdateMovieRequest {
            title: Some("Lật Mặt 7".to_string()),
            ..Default::default()
        };
        assert!(renamed.validate().is_ok());
        assert!(UpdateMovieRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_with_video() {
        let req = UpdateMovieRequest::with_video("v1", "/videos/v1/master.m3u8");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["videoId"], "v1");
        assert_eq!(value["videoStatus"], "READY");
        assert!(value.get("title").is_none());
        assert!(req.validate().is_ok());
    }
}
