use axum::{Router, routing::get};
use std::net::SocketAddr;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::{Res, api, config::Settings, info, state::AppState, warning};

/// Builds the router with every endpoint and the frontend fallback.
///
/// Paths not matched by a route are served from the frontend directory;
/// unknown paths get its `index.html` so client-side routing works.
pub fn create_router(state: AppState) -> Router {
    let static_dir = &state.settings.static_dir;
    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/getAccessToken", get(api::get_access_token))
        .route("/refresh_token", get(api::refresh_token))
        .route("/user-profile", get(api::user_profile))
        .route("/top-data", get(api::top_data))
        .route("/search", get(api::search))
        .route("/track/{id}", get(api::track))
        .route("/artist/{id}", get(api::artist))
        .route("/album/{id}", get(api::album))
        .fallback_service(frontend)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured port and serves until the process ends.
///
/// With `open_browser` the login page is opened in the default browser once
/// the listener is bound.
pub async fn start_api_server(settings: Settings, open_browser: bool) -> Res<()> {
    let port = settings.port;
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server is listening on port {}", port);

    if open_browser {
        let login_url = format!("http://localhost:{}/login", port);
        if webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            )
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
