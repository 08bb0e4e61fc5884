//! Session state for authenticated requests.

use async_trait::async_trait;
use nextsound_core::{AuthProvider, User};
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone)]
struct Session {
    user: User,
    access_token: String,
}

/// Signed-in user and bearer token supplied by the host
///
/// The sign-in flow itself belongs to the host; this only holds its result.
#[derive(Debug, Default)]
pub struct StaticSession {
    session: RwLock<Option<Session>>,
}

impl StaticSession {
    /// No user signed in
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User, access_token: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Some(Session {
                user,
                access_token: access_token.into(),
            })),
        }
    }

    pub async fn sign_in(&self, user: User, access_token: impl Into<String>) {
        info!(user = %user.id, "Signed in");
        *self.session.write().await = Some(Session {
            user,
            access_token: access_token.into(),
        });
    }

    pub async fn sign_out(&self) {
        *self.session.write().await = None;
        info!("Signed out");
    }

    /// User id and bearer token, if signed in
    pub async fn credentials(&self) -> Option<(String, String)> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| (s.user.id.clone(), s.access_token.clone()))
    }
}

#[async_trait]
impl AuthProvider for StaticSession {
    async fn current_user(&self) -> nextsound_core::Result<Option<User>> {
        Ok(self.session.read().await.as_ref().map(|s| s.user.clone()))
    }
}
