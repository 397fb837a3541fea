//! Admin login and logout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use mousse_melts_core::Route;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::OptionalAdmin;
use crate::models::{CurrentAdmin, session_keys};
use crate::routes::layout::ShopChrome;
use crate::routes::navigate;
use crate::services::auth::{AuthError, INVALID_CREDENTIALS_MESSAGE};
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub chrome: ShopChrome,
    pub username: String,
    pub error: Option<String>,
}

impl LoginTemplate {
    fn new(username: String, error: Option<String>) -> Self {
        Self {
            chrome: ShopChrome::admin_area(Route::Login),
            username,
            error,
        }
    }
}

/// Display the login page.
///
/// A signed-in admin goes straight to the dashboard.
pub async fn login_page(OptionalAdmin(admin): OptionalAdmin) -> Response {
    if admin.is_some() {
        return navigate(Route::Admin).into_response();
    }
    LoginTemplate::new(String::new(), None).into_response()
}

/// Handle login form submission.
///
/// Every attempt waits for the configured delay before the credentials are
/// checked. Success rotates the session ID and stores the admin identity.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    tokio::time::sleep(state.config().login_delay).await;

    let credentials = state.credentials().clone();
    let LoginForm { username, password } = form;
    let attempted = username.clone();
    let verified = tokio::task::spawn_blocking(move || credentials.verify(&username, &password))
        .await
        .map_err(|e| AppError::Internal(format!("credential check failed: {e}")))?;

    match verified {
        Ok(()) => {
            session.cycle_id().await?;

            let admin = CurrentAdmin {
                username: state.credentials().username().to_string(),
                logged_in_at: Utc::now(),
            };
            session.insert(session_keys::CURRENT_ADMIN, &admin).await?;

            set_sentry_user(&admin.username);
            tracing::info!("Admin logged in");

            Ok(navigate(Route::Admin).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Admin login failed");
            let page = LoginTemplate::new(
                attempted,
                Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
            );
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Logout and clear the admin identity and draft.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::ADMIN_DRAFT)
        .await?;
    clear_sentry_user();

    Ok(navigate(Route::Home).into_response())
}
