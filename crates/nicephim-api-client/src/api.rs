//! Domain methods for the nicephim API client.
//!
//! Each submodule adds `impl ApiClient` methods for one endpoint group. Request
//! bodies are validated before anything goes on the wire; envelope responses are
//! unwrapped so callers only see the payload or a [`nicephim_core::ClientError`].

pub mod auth;
pub mod genres;
pub mod images;
pub mod movies;
pub mod videos;

/// Admin API prefix for movies.
pub const MOVIES_PATH: &str = "/api/admin/movies";
/// Admin API prefix for genres.
pub const GENRES_PATH: &str = "/api/admin/genres";

/// Percent-encode a single path segment (slugs, ids coming from user input).
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
