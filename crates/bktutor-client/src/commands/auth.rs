//! Login boundary: session check, sign-in and sign-out.

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::events::{Navigation, Notice, Step};

/// Guard for pages that need a signed-in student. Any failure, including
/// a network error, sends the user to the login page.
pub async fn check_session(api: &ApiClient) -> Step {
    match api.me().await {
        Ok(()) => Step::Stay,
        Err(e) => {
            debug!(error = %e, "no valid session");
            Step::to_login()
        }
    }
}

/// The login page skips itself when a session already exists.
pub async fn redirect_if_signed_in(api: &ApiClient) -> Step {
    match api.me().await {
        Ok(()) => Step::Navigate(Navigation::StudentHome),
        Err(_) => Step::Stay,
    }
}

pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<Navigation, Notice> {
    match api.login(email, password).await {
        Ok(()) => {
            info!(email = %email.trim(), "signed in");
            Ok(Navigation::StudentHome)
        }
        Err(ApiError::Transport(e)) => {
            warn!(error = %e, "login request failed");
            Err(Notice::error("Network error. Try again."))
        }
        Err(ApiError::Status {
            message: Some(message),
            ..
        }) => Err(Notice::error(message)),
        Err(e) => {
            debug!(error = %e, "login rejected");
            Err(Notice::error("Login failed"))
        }
    }
}

/// Sign-out always ends on the login page, even when the call fails.
pub async fn logout(api: &ApiClient) -> Step {
    if let Err(e) = api.logout().await {
        warn!(error = %e, "logout request failed");
    }
    Step::to_login()
}
