//! Shopper state extractor.
//!
//! Loads the visitor's [`ShopperSession`] from the session store. The first
//! request of a new visitor creates the state and counts a visit.

use std::ops::{Deref, DerefMut};

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{ShopperSession, session_keys};
use crate::state::AppState;

/// The visitor's shop state, bound to their session.
///
/// Changes are only persisted by [`Shopper::save`].
pub struct Shopper {
    session: Session,
    state: ShopperSession,
}

impl Shopper {
    /// Write the shopper state back to the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save(&self) -> Result<(), AppError> {
        self.session.insert(session_keys::SHOPPER, &self.state).await?;
        Ok(())
    }
}

impl Deref for Shopper {
    type Target = ShopperSession;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl DerefMut for Shopper {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl<S> FromRequestParts<S> for Shopper
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let stored = session
            .get::<ShopperSession>(session_keys::SHOPPER)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable shopper state");
                None
            });

        let shopper = match stored {
            Some(shopper) => shopper,
            None => {
                let fresh = ShopperSession::default();
                session.insert(session_keys::SHOPPER, &fresh).await?;
                AppState::from_ref(state).catalog().record_visit();
                fresh
            }
        };

        Ok(Self {
            session,
            state: shopper,
        })
    }
}
