use nicephim_core::models::{
    CreateMovieRequest, Envelope, MoviePage, MovieResponse, UpdateMovieRequest,
};
use nicephim_core::ClientError;
use uuid::Uuid;
use validator::Validate;

use super::{segment, MOVIES_PATH};
use crate::ApiClient;

impl ApiClient {
    #[tracing::instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_movie(
        &self,
        request: &CreateMovieRequest,
    ) -> Result<MovieResponse, ClientError> {
        request.validate()?;
        let envelope: Envelope<MovieResponse> = self.post_json(MOVIES_PATH, request).await?;
        let movie = envelope.into_data()?;
        tracing::info!(movie_id = %movie.movie_id, "Movie created");
        Ok(movie)
    }

    /// List movies, zero-based `page`.
    pub async fn list_movies(&self, page: u32, size: u32) -> Result<MoviePage, ClientError> {
        let query = [("page", page.to_string()), ("size", size.to_string())];
        let envelope: Envelope<Vec<MovieResponse>> = self.get(MOVIES_PATH, &query).await?;
        let pagination = envelope.pagination.clone();
        Ok(MoviePage {
            movies: envelope.into_data()?,
            pagination,
        })
    }

    pub async fn get_movie(&self, movie_id: Uuid) -> Result<MovieResponse, ClientError> {
        let envelope: Envelope<MovieResponse> = self
            .get(&format!("{}/{}", MOVIES_PATH, movie_id), &[])
            .await?;
        envelope.into_data()
    }

    pub async fn get_movie_by_slug(&self, slug: &str) -> Result<MovieResponse, ClientError> {
        let envelope: Envelope<MovieResponse> = self
            .get(&format!("{}/slug/{}", MOVIES_PATH, segment(slug)), &[])
            .await?;
        envelope.into_data()
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update_movie(
        &self,
        movie_id: Uuid,
        request: &UpdateMovieRequest,
    ) -> Result<MovieResponse, ClientError> {
        request.validate()?;
        let envelope: Envelope<MovieResponse> = self
            .put_json(&format!("{}/{}", MOVIES_PATH, movie_id), request)
            .await?;
        envelope.into_data()
    }

    /// Returns the backend's confirmation message.
    #[tracing::instrument(skip(self))]
    pub async fn delete_movie(&self, movie_id: Uuid) -> Result<Option<String>, ClientError> {
        let envelope: Envelope<serde_json::Value> = self
            .delete(&format!("{}/{}", MOVIES_PATH, movie_id))
            .await?;
        envelope.into_ack()
    }

    pub async fn search_movies(&self, title: &str) -> Result<Vec<MovieResponse>, ClientError> {
        let query = [("title", title.to_string())];
        let envelope: Envelope<Vec<MovieResponse>> = self
            .get(&format!("{}/search", MOVIES_PATH), &query)
            .await?;
        envelope.into_data()
    }
}
