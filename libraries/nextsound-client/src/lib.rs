//! NextSound Client
//!
//! HTTP implementations of the NextSound collaborator traits.
//!
//! # Features
//!
//! - **iTunes catalog**: track/artist search, album and artist lookups, preview URLs
//! - **Deezer catalog**: track/artist search, albums, artist top tracks
//! - **Favorites**: per-user favorites over a PostgREST-style REST API
//! - **Session**: signed-in user and bearer token for authenticated calls
//!
//! Every request goes through one retry policy: transient failures
//! (connection errors, timeouts, 5xx, 429) are retried with linear backoff.
//!
//! # Example
//!
//! ```ignore
//! use nextsound_client::{ClientConfig, ItunesCatalog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = ItunesCatalog::new(&ClientConfig::default())?;
//!
//!     let tracks = catalog.search_tracks("daft punk", 5).await?;
//!     for track in tracks {
//!         println!("{} - {}", track.artist, track.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod deezer;
mod error;
mod favorites;
mod http;
mod itunes;
mod types;

pub use auth::StaticSession;
pub use deezer::DeezerCatalog;
pub use error::{ClientError, Result};
pub use favorites::RestFavorites;
pub use http::HttpClient;
pub use itunes::ItunesCatalog;
pub use types::{normalize_base_url, ClientConfig, RetryPolicy};
