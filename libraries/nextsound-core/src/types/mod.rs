//! Domain types for NextSound

mod catalog;
mod track;
mod user;

pub use catalog::{AlbumSummary, AlbumWithTracks, ArtistSummary};
pub use track::{Provider, Track, TrackKey};
pub use user::User;
