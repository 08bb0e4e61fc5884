//! NextSound command-line host
//!
//! Loads configuration, wires the HTTP clients into the player and the
//! command palette, and drives playback against a headless output.

pub mod app;
pub mod config;
pub mod error;
pub mod headless;

pub use app::{playback_finished, App};
pub use config::{AppConfig, SessionSettings, StorageSettings};
pub use error::{CliError, Result};
pub use headless::HeadlessOutput;
