//! Auth route handlers: registration, login, logout.

use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Handle registration.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let user = AuthService::new(state.pool())
        .register(&form.email, &form.password)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Redirect::to("/login"))
}

/// Handle login: verify credentials and attach the user to the session.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let user = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await?;

    // Session fixation defense: drop any pre-login session state
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("Session error: {e}")))?;

    let current = CurrentUser {
        id: user.id,
        email: user.email,
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("Session error: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to("/"))
}

/// Handle logout: clear the user from the session.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("Session error: {e}")))?;

    Ok(Redirect::to("/"))
}
