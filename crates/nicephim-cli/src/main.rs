//! nicephim CLI: admin client for the nicephim backend.
//!
//! Reads NICEPHIM_API_URL (or NEXT_PUBLIC_API_URL / API_URL) and the poll
//! settings from the environment or `.env`.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use nicephim_api_client::{
    ApiClient, FileSessionStore, PollConfig, Session, UploadObserver, VideoUploader,
};
use nicephim_cli::{init_tracing, movie_table};
use nicephim_core::models::{
    CreateGenreRequest, CreateMovieRequest, ImageKind, LoginRequest, RegisterRequest,
    UpdateGenreRequest, UpdateMovieRequest,
};
use nicephim_core::{ClientConfig, ClientError, ErrorMetadata, SelectedFile};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "nicephim", about = "nicephim admin CLI")]
struct Cli {
    /// Backend base URL (overrides NICEPHIM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video and follow its processing
    Video {
        #[command(subcommand)]
        sub: VideoCommands,
    },
    /// Movie catalogue
    Movie {
        #[command(subcommand)]
        sub: MovieCommands,
    },
    /// Genres and movie-genre links
    Genre {
        #[command(subcommand)]
        sub: GenreCommands,
    },
    /// Poster and banner artwork
    Image {
        #[command(subcommand)]
        sub: ImageCommands,
    },
    /// Account and local session
    Auth {
        #[command(subcommand)]
        sub: AuthCommands,
    },
}

#[derive(Subcommand)]
enum VideoCommands {
    /// Upload a video file and wait until it is ready
    Upload {
        /// Path to the video file
        file: PathBuf,
        /// Attach the finished video to this movie
        #[arg(long, value_name = "MOVIE_ID")]
        attach: Option<Uuid>,
    },
    /// Show the processing status of an uploaded video
    Status {
        /// Video id returned by the upload
        video_id: String,
    },
}

#[derive(Args)]
struct MovieFields {
    #[arg(long)]
    alias_title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    year: Option<i16>,
    #[arg(long)]
    age_rating: Option<String>,
    #[arg(long)]
    imdb_rating: Option<f64>,
    #[arg(long)]
    series: Option<bool>,
    #[arg(long)]
    poster_url: Option<String>,
    #[arg(long)]
    banner_url: Option<String>,
    #[arg(long)]
    video_id: Option<String>,
    #[arg(long)]
    hls_url: Option<String>,
}

#[derive(Subcommand)]
enum MovieCommands {
    /// List movies as a table
    List {
        /// Page index (0-based)
        #[arg(long, default_value = "0")]
        page: u32,
        /// Page size
        #[arg(long, default_value = "20")]
        size: u32,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Get a movie by id
    Get { id: Uuid },
    /// Get a movie by slug
    Slug { slug: String },
    /// Search movies by title
    Search { title: String },
    /// Create a movie
    Create {
        #[arg(long)]
        title: String,
        /// Genre id; repeat for several
        #[arg(long = "genre")]
        genres: Vec<Uuid>,
        #[command(flatten)]
        fields: MovieFields,
    },
    /// Update fields of a movie
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: MovieFields,
    },
    /// Delete a movie
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum GenreCommands {
    /// List all genres
    List,
    /// Get a genre by id
    Get { id: Uuid },
    /// Create a genre
    Create { name: String },
    /// Rename a genre
    Update { id: Uuid, name: String },
    /// Delete a genre
    Delete { id: Uuid },
    /// List the genres of a movie
    ForMovie { movie_id: Uuid },
    /// Link a genre to a movie
    Attach { genre_id: Uuid, movie_id: Uuid },
    /// Unlink a genre from a movie
    Detach { genre_id: Uuid, movie_id: Uuid },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Upload a poster or banner image
    Upload {
        /// poster or banner
        #[arg(long)]
        kind: ImageKind,
        /// Path to the image file
        file: PathBuf,
        /// Set the uploaded URL on this movie
        #[arg(long, value_name = "MOVIE_ID")]
        attach: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

enum Outcome {
    Ready { video_id: String, hls_url: String },
    Failed(String),
}

/// Forwards the uploader's terminal callback to the command.
struct ChannelObserver {
    tx: mpsc::UnboundedSender<Outcome>,
}

impl UploadObserver for ChannelObserver {
    fn on_video_ready(&self, video_id: &str, hls_url: &str) {
        let _ = self.tx.send(Outcome::Ready {
            video_id: video_id.to_string(),
            hls_url: hls_url.to_string(),
        });
    }

    fn on_error(&self, message: &str) {
        let _ = self.tx.send(Outcome::Failed(message.to_string()));
    }
}

async fn upload_video(
    client: Arc<ApiClient>,
    config: &ClientConfig,
    file: PathBuf,
    attach: Option<Uuid>,
) -> anyhow::Result<()> {
    let selected = SelectedFile::from_path(&file)
        .with_context(|| format!("Cannot read {}", file.display()))?;

    let (tx, mut outcomes) = mpsc::unbounded_channel();
    let uploader = VideoUploader::new(
        client.clone(),
        Arc::new(ChannelObserver { tx }),
        PollConfig::from(config),
    );
    uploader.select_file(selected)?;
    tracing::info!("{}", uploader.state().message);

    let mut states = uploader.subscribe();
    let progress = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            tracing::info!(status = %state.status, progress = state.progress, "{}", state.message);
        }
    });

    let flow = async {
        uploader.upload().await?;
        Ok::<_, ClientError>(outcomes.recv().await)
    };

    let outcome = tokio::select! {
        result = flow => result,
        _ = tokio::signal::ctrl_c() => {
            uploader.reset();
            progress.abort();
            bail!("Upload cancelled");
        }
    };
    progress.abort();

    match outcome? {
        Some(Outcome::Ready { video_id, hls_url }) => {
            if let Some(movie_id) = attach {
                client
                    .update_movie(movie_id, &UpdateMovieRequest::with_video(&video_id, &hls_url))
                    .await?;
                tracing::info!(
                    movie_id = %movie_id,
                    video_id = %video_id,
                    "Video attached to movie"
                );
            }
            print_json(&serde_json::json!({
                "videoId": video_id,
                "hlsUrl": hls_url,
                "playbackUrl": client.resolve_url(&hls_url),
            }))
        }
        Some(Outcome::Failed(message)) => bail!(message),
        None => bail!("Upload ended without a result"),
    }
}

fn movie_update(title: Option<String>, fields: MovieFields) -> UpdateMovieRequest {
    UpdateMovieRequest {
        title,
        alias_title: fields.alias_title,
        description: fields.description,
        release_year: fields.year,
        age_rating: fields.age_rating,
        imdb_rating: fields.imdb_rating,
        is_series: fields.series,
        poster_url: fields.poster_url,
        banner_url: fields.banner_url,
        video_id: fields.video_id,
        hls_url: fields.hls_url,
        video_status: None,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config.validate()?;
    }
    let client = Arc::new(ApiClient::from_config(&config)?);
    tracing::debug!(api_url = %client.base_url(), "Using backend");

    match cli.command {
        Commands::Video { sub } => match sub {
            VideoCommands::Upload { file, attach } => {
                upload_video(client, &config, file, attach).await?;
            }
            VideoCommands::Status { video_id } => {
                print_json(&client.video_status(&video_id).await?)?;
            }
        },
        Commands::Movie { sub } => match sub {
            MovieCommands::List { page, size, json } => {
                let movies = client.list_movies(page, size).await?;
                if json {
                    print_json(&movies)?;
                } else {
                    print!("{}", movie_table(&movies));
                }
            }
            MovieCommands::Get { id } => print_json(&client.get_movie(id).await?)?,
            MovieCommands::Slug { slug } => print_json(&client.get_movie_by_slug(&slug).await?)?,
            MovieCommands::Search { title } => print_json(&client.search_movies(&title).await?)?,
            MovieCommands::Create {
                title,
                genres,
                fields,
            } => {
                let request = CreateMovieRequest {
                    title,
                    alias_title: fields.alias_title,
                    description: fields.description,
                    release_year: fields.year,
                    age_rating: fields.age_rating,
                    imdb_rating: fields.imdb_rating,
                    is_series: fields.series,
                    poster_url: fields.poster_url,
                    banner_url: fields.banner_url,
                    genre_ids: genres,
                    video_id: fields.video_id,
                    hls_url: fields.hls_url,
                };
                print_json(&client.create_movie(&request).await?)?;
            }
            MovieCommands::Update { id, title, fields } => {
                let request = movie_update(title, fields);
                print_json(&client.update_movie(id, &request).await?)?;
            }
            MovieCommands::Delete { id } => {
                let message = client.delete_movie(id).await?;
                print_json(&serde_json::json!({ "success": true, "message": message }))?;
            }
        },
        Commands::Genre { sub } => match sub {
            GenreCommands::List => print_json(&client.list_genres().await?)?,
            GenreCommands::Get { id } => print_json(&client.get_genre(id).await?)?,
            GenreCommands::Create { name } => {
                print_json(&client.create_genre(&CreateGenreRequest::new(name)).await?)?
            }
            GenreCommands::Update { id, name } => {
                print_json(&client.update_genre(id, &UpdateGenreRequest::new(name)).await?)?
            }
            GenreCommands::Delete { id } => {
                let message = client.delete_genre(id).await?;
                print_json(&serde_json::json!({ "success": true, "message": message }))?;
            }
            GenreCommands::ForMovie { movie_id } => {
                print_json(&client.genres_for_movie(movie_id).await?)?
            }
            GenreCommands::Attach { genre_id, movie_id } => {
                let message = client.add_genre_to_movie(genre_id, movie_id).await?;
                print_json(&serde_json::json!({ "success": true, "message": message }))?;
            }
            GenreCommands::Detach { genre_id, movie_id } => {
                let message = client.remove_genre_from_movie(genre_id, movie_id).await?;
                print_json(&serde_json::json!({ "success": true, "message": message }))?;
            }
        },
        Commands::Image { sub } => match sub {
            ImageCommands::Upload { kind, file, attach } => {
                let image = client.upload_image(kind, &file).await?;
                if let Some(movie_id) = attach {
                    let mut request = UpdateMovieRequest::default();
                    match kind {
                        ImageKind::Poster => request.poster_url = Some(image.url.clone()),
                        ImageKind::Banner => request.banner_url = Some(image.url.clone()),
                    }
                    client.update_movie(movie_id, &request).await?;
                    tracing::info!(movie_id = %movie_id, %kind, "Artwork attached to movie");
                }
                print_json(&image)?;
            }
        },
        Commands::Auth { sub } => {
            let session = Session::init(Arc::new(FileSessionStore::new(&config.session_file)));
            match sub {
                AuthCommands::Register {
                    username,
                    email,
                    password,
                    display_name,
                } => {
                    let request = RegisterRequest {
                        username,
                        email,
                        password,
                        display_name,
                    };
                    let user_id = client.register(&request).await?;
                    print_json(&serde_json::json!({ "success": true, "userId": user_id }))?;
                }
                AuthCommands::Login { username, password } => {
                    let user = client.login(&LoginRequest { username, password }).await?;
                    session.login(user)?;
                    session.ensure_admin_status()?;
                    print_json(&session.current())?;
                }
                AuthCommands::Logout => {
                    session.logout()?;
                    print_json(&serde_json::json!({ "success": true }))?;
                }
                AuthCommands::Whoami => match session.current() {
                    Some(user) => print_json(&serde_json::json!({
                        "user": user,
                        "label": user.display_label(),
                        "admin": user.is_admin(),
                    }))?,
                    None => bail!("Not signed in"),
                },
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    run(cli).await.map_err(|err| match err.downcast::<ClientError>() {
        Ok(e) => {
            let message = e.client_message();
            tracing::debug!(code = e.error_code(), status = ?e.http_status(), "Request failed");
            anyhow::Error::new(e).context(message)
        }
        Err(err) => err,
    })
}
