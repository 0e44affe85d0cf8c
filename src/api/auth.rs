use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use super::ApiError;
use crate::{
    info,
    management::{CallbackParams, STATE_KEY},
    state::AppState,
    success,
    types::AccessTokenResponse,
    warning,
};

/// `302 Found` pointing at `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn state_cookie(value: String) -> Cookie<'static> {
    Cookie::build((STATE_KEY, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Starts the login: remembers a fresh state in a cookie and sends the
/// browser to Spotify's consent page.
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Response) {
    let redirect = state.auth.begin_login();
    info!("Redirecting browser to Spotify for authorization");

    (
        jar.add(state_cookie(redirect.state)),
        found(redirect.url.as_str()),
    )
}

/// Spotify's redirect target after the user granted or denied access.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Response) {
    let mut stored = jar.get(STATE_KEY).map(|c| c.value().to_string());
    let had_state = stored.is_some();

    let result = state.auth.handle_callback(&params, &mut stored).await;

    // the state is single-use; drop the cookie once it has been consumed
    let jar = if had_state && stored.is_none() {
        jar.remove(Cookie::build(STATE_KEY).path("/"))
    } else {
        jar
    };

    match result {
        Ok(()) => {
            success!("Authorization completed");
            (jar, found("/profile"))
        }
        Err(e) => {
            warning!("Authorization callback rejected: {}", e);
            (jar, found(&e.redirect_target()))
        }
    }
}

pub async fn get_access_token(State(state): State<AppState>) -> Json<AccessTokenResponse> {
    Json(AccessTokenResponse {
        access_token: state.auth.access_token().await,
    })
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    refresh_token: Option<String>,
}

/// Exchanges a refresh token for a new access token.
///
/// Uses the `refresh_token` query parameter when given, the stored refresh
/// token otherwise.
pub async fn refresh_token(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let refresh_token = match params.refresh_token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => state
            .tokens()
            .refresh_token()
            .await
            .ok_or_else(|| ApiError::BadRequest("missing refresh_token".to_string()))?,
    };

    let access_token = state.auth.refresh_access_token(&refresh_token).await?;

    Ok(Json(AccessTokenResponse { access_token }))
}
