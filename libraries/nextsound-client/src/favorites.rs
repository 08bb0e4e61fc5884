//! Favorites service client (PostgREST-style `favorites` table).
//!
//! Rows are `{user_id, track_id, track_data, created_at}` with a unique
//! constraint on `(user_id, track_id)`. `track_id` holds the
//! provider-qualified key (`itunes:123`), so the same raw id from two
//! providers maps to two rows.

use crate::auth::StaticSession;
use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::types::{normalize_base_url, ClientConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nextsound_core::{FavoritesBackend, Track, TrackKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

const TABLE_PATH: &str = "/rest/v1/favorites";

#[derive(Debug, Deserialize)]
struct FavoriteRow {
    track_data: Track,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct NewFavorite<'a> {
    user_id: &'a str,
    track_id: &'a str,
    track_data: &'a Track,
}

/// Favorites backend over HTTP, scoped to the signed-in user
pub struct RestFavorites {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    session: Arc<StaticSession>,
}

impl RestFavorites {
    pub fn new(config: &ClientConfig, session: Arc<StaticSession>) -> Result<Self> {
        let base_url = config
            .favorites_url
            .as_deref()
            .ok_or_else(|| ClientError::InvalidUrl("favorites URL not configured".into()))?;

        Ok(Self {
            http: HttpClient::new(config)?,
            base_url: normalize_base_url(base_url)?,
            api_key: config.favorites_api_key.clone(),
            session,
        })
    }

    /// Use a pre-built HTTP client
    pub fn with_http(
        http: HttpClient,
        base_url: &str,
        api_key: Option<String>,
        session: Arc<StaticSession>,
    ) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            api_key,
            session,
        })
    }

    async fn credentials(&self) -> Result<(String, String)> {
        self.session.credentials().await.ok_or(ClientError::AuthRequired)
    }

    fn authorize(&self, request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(token);
        match &self.api_key {
            Some(key) => request.header("apikey", key),
            None => request,
        }
    }

    /// All favorites, newest first
    pub async fn list(&self) -> Result<Vec<Track>> {
        let (user_id, token) = self.credentials().await?;
        let url = format!("{}{}", self.base_url, TABLE_PATH);
        debug!(url = %url, "Fetching favorites");

        let user_filter = format!("eq.{user_id}");
        let mut rows: Vec<FavoriteRow> = self
            .http
            .json(|http| {
                self.authorize(http.get(&url), &token).query(&[
                    ("select", "track_data,created_at"),
                    ("user_id", user_filter.as_str()),
                    ("order", "created_at.desc"),
                ])
            })
            .await?;

        // Keep newest-first even if the service ignored `order`
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = rows.len(), "Fetched favorites");
        Ok(rows.into_iter().map(|row| row.track_data).collect())
    }

    pub async fn add(&self, track: &Track) -> Result<()> {
        let (user_id, token) = self.credentials().await?;
        let url = format!("{}{}", self.base_url, TABLE_PATH);
        let track_id = track.key().to_string();
        debug!(url = %url, track_id = %track_id, "Adding favorite");

        let body = NewFavorite {
            user_id: &user_id,
            track_id: &track_id,
            track_data: track,
        };
        self.http
            .send(|http| {
                self.authorize(http.post(&url), &token)
                    .header("Prefer", "return=minimal")
                    .json(&body)
            })
            .await?;

        info!(track_id = %track_id, "Favorite added");
        Ok(())
    }

    pub async fn remove(&self, key: &TrackKey) -> Result<()> {
        let (user_id, token) = self.credentials().await?;
        let url = format!("{}{}", self.base_url, TABLE_PATH);
        let track_id = key.to_string();
        debug!(url = %url, track_id = %track_id, "Removing favorite");

        let user_filter = format!("eq.{user_id}");
        let track_filter = format!("eq.{track_id}");
        let deleted: Vec<serde_json::Value> = self
            .http
            .json(|http| {
                self.authorize(http.delete(&url), &token)
                    .header("Prefer", "return=representation")
                    .query(&[
                        ("user_id", user_filter.as_str()),
                        ("track_id", track_filter.as_str()),
                    ])
            })
            .await?;

        if deleted.is_empty() {
            return Err(ClientError::NotFound {
                entity: "favorite".to_string(),
                id: track_id,
            });
        }
        info!(track_id = %track_id, "Favorite removed");
        Ok(())
    }
}

#[async_trait]
impl FavoritesBackend for RestFavorites {
    async fn list(&self) -> nextsound_core::Result<Vec<Track>> {
        Ok(RestFavorites::list(self).await?)
    }

    async fn add(&self, track: &Track) -> nextsound_core::Result<()> {
        Ok(RestFavorites::add(self, track).await?)
    }

    async fn remove(&self, key: &TrackKey) -> nextsound_core::Result<()> {
        Ok(RestFavorites::remove(self, key).await?)
    }
}

impl std::fmt::Debug for RestFavorites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestFavorites")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}
