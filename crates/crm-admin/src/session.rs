//! Authenticated-user gate.
//!
//! Every page runs only after [`require_user`] has resolved the session token. A missing
//! or unknown session maps to [`AuthError::Unauthenticated`], which carries the route
//! the caller should redirect to.

use crate::backend::{BackendError, SessionProvider};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Entry point unauthenticated requests are sent to.
pub const LOGIN_ROUTE: &str = "/login";

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
}

impl AdminUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not signed in, redirect to {redirect_to}")]
    Unauthenticated { redirect_to: &'static str },

    #[error("Session lookup failed: {0}")]
    Backend(#[from] BackendError),
}

impl AuthError {
    fn unauthenticated() -> Self {
        AuthError::Unauthenticated {
            redirect_to: LOGIN_ROUTE,
        }
    }
}

/// Resolves `token` to the signed-in admin or refuses.
#[instrument(skip(provider, token))]
pub async fn require_user<S>(provider: &S, token: &str) -> Result<AdminUser, AuthError>
where
    S: SessionProvider + ?Sized,
{
    if token.trim().is_empty() {
        warn!("Request without session token");
        return Err(AuthError::unauthenticated());
    }
    match provider.current_user(token).await? {
        Some(user) => {
            debug!(user = %user.email, "Session resolved");
            Ok(user)
        }
        None => {
            warn!("Unknown or expired session");
            Err(AuthError::unauthenticated())
        }
    }
}
