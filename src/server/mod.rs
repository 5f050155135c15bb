//! Development server
//!
//! Serves the home page from a live pagination controller, so the load-more
//! control works without a browser script: it posts to `/load-more`, which
//! appends the next page and redirects back to the listing.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cms::{ContentClient, PageSource};
use crate::commands::generate;
use crate::generator::Generator;
use crate::pagination::{LoadOutcome, SharedPagination};
use crate::Site;

const LOAD_MORE_PATH: &str = "/load-more";

/// Server state
pub struct AppState<S> {
    generator: Generator,
    pagination: SharedPagination<S>,
}

impl<S: PageSource> AppState<S> {
    pub fn new(generator: Generator, pagination: SharedPagination<S>) -> Self {
        Self {
            generator,
            pagination,
        }
    }
}

/// Routes of the development server; other paths are served from `public_dir`
pub fn router<S: PageSource + 'static>(state: Arc<AppState<S>>) -> Router {
    let public_dir = state.generator.site().public_dir.clone();

    Router::new()
        .route("/", get(home::<S>))
        .route(LOAD_MORE_PATH, post(load_more::<S>))
        .route("/pagination.json", get(pagination_json::<S>))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Generate the site, then start the development server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let client = ContentClient::new(&site.config.api).context("invalid api configuration")?;
    let controller = generate::build(site, &client).await?;

    let generator = Generator::new(site)?;
    generator.generate(&controller)?;

    let state = Arc::new(AppState::new(
        generator,
        SharedPagination::new(controller, client),
    ));
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port)
        .parse()
        .with_context(|| format!("invalid address {}:{}", ip, port))?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home<S: PageSource + 'static>(State(state): State<Arc<AppState<S>>>) -> Response {
    let controller = state.pagination.snapshot();
    match state.generator.render(&controller, Some(LOAD_MORE_PATH)) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render home page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

async fn load_more<S: PageSource + 'static>(State(state): State<Arc<AppState<S>>>) -> Redirect {
    match state.pagination.load_next_page().await {
        Ok(LoadOutcome::Appended { count, page }) => {
            tracing::info!("Loaded page {} ({} posts)", page, count);
        }
        Ok(outcome) => tracing::debug!("Load more ignored: {:?}", outcome),
        // The failure is kept by the controller and shown on the next render
        Err(e) => tracing::warn!("Load more failed: {}", e),
    }
    Redirect::to("/")
}

async fn pagination_json<S: PageSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    Json(state.pagination.snapshot().into_state())
}
