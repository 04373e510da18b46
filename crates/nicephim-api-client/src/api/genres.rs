use nicephim_core::models::{CreateGenreRequest, Envelope, GenreResponse, UpdateGenreRequest};
use nicephim_core::ClientError;
use uuid::Uuid;
use validator::Validate;

use super::GENRES_PATH;
use crate::ApiClient;

impl ApiClient {
    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_genre(
        &self,
        request: &CreateGenreRequest,
    ) -> Result<GenreResponse, ClientError> {
        request.validate()?;
        let envelope: Envelope<GenreResponse> = self.post_json(GENRES_PATH, request).await?;
        envelope.into_data()
    }

    pub async fn list_genres(&self) -> Result<Vec<GenreResponse>, ClientError> {
        let envelope: Envelope<Vec<GenreResponse>> = self.get(GENRES_PATH, &[]).await?;
        envelope.into_data()
    }

    pub async fn get_genre(&self, genre_id: Uuid) -> Result<GenreResponse, ClientError> {
        let envelope: Envelope<GenreResponse> = self
            .get(&format!("{}/{}", GENRES_PATH, genre_id), &[])
            .await?;
        envelope.into_data()
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update_genre(
        &self,
        genre_id: Uuid,
        request: &UpdateGenreRequest,
    ) -> Result<GenreResponse, ClientError> {
        request.validate()?;
        let envelope: Envelope<GenreResponse> = self
            .put_json(&format!("{}/{}", GENRES_PATH, genre_id), request)
            .await?;
        envelope.into_data()
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_genre(&self, genre_id: Uuid) -> Result<Option<String>, ClientError> {
        let envelope: Envelope<serde_json::Value> = self
            .delete(&format!("{}/{}", GENRES_PATH, genre_id))
            .await?;
        envelope.into_ack()
    }

    pub async fn genres_for_movie(
        &self,
        movie_id: Uuid,
    ) -> Result<Vec<GenreResponse>, ClientError> {
        let envelope: Envelope<Vec<GenreResponse>> = self
            .get(&format!("{}/movie/{}", GENRES_PATH, movie_id), &[])
            .await?;
        envelope.into_data()
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_genre_to_movie(
        &self,
        genre_id: Uuid,
        movie_id: Uuid,
    ) -> Result<Option<String>, ClientError> {
        let envelope: Envelope<serde_json::Value> = self
            .post_empty(&format!("{}/{}/movies/{}", GENRES_PATH, genre_id, movie_id))
            .await?;
        envelope.into_ack()
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_genre_from_movie(
        &self,
        genre_id: Uuid,
        movie_id: Uuid,
    ) -> Result<Option<String>, ClientError> {
        let envelope: Envelope<serde_json::Value> = self
            .delete(&format!("{}/{}/movies/{}", GENRES_PATH, genre_id, movie_id))
            .await?;
        envelope.into_ack()
    }
}
