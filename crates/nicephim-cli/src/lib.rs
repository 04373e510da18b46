use nicephim_core::models::{MoviePage, MovieResponse};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn genre_names(movie: &MovieResponse) -> String {
    movie
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a page of movies as a fixed-width table.
pub fn movie_table(page: &MoviePage) -> String {
    let mut out = String::new();

    if let Some(p) = &page.pagination {
        out.push_str(&format!(
            "Page {}/{} ({} movies total)\n",
            p.page + 1,
            p.total_pages.max(1),
            p.total
        ));
    }

    if page.movies.is_empty() {
        out.push_str("No movies found.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<36} {:<30} {:>6} {:>5} {:<8} {:<25}\n",
        "ID", "Title", "Year", "IMDb", "Video", "Genres"
    ));
    out.push_str(&"-".repeat(115));
    out.push('\n');

    for movie in &page.movies {
        let year = movie
            .release_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        let rating = movie
            .imdb_rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        let video = if movie.has_playable_video() {
            "ready"
        } else {
            movie.video_status.as_deref().unwrap_or("-")
        };
        out.push_str(&format!(
            "{:<36} {:<30} {:>6} {:>5} {:<8} {:<25}\n",
            movie.movie_id,
            truncate_string(&movie.title, 30),
            year,
            rating,
            truncate_string(&video.to_lowercase(), 8),
            truncate_string(&genre_names(movie), 25)
        ));
    }

    out
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
