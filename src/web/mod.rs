use crate::db::Database;
use crate::error::{Error, Result};
use axum::{
    Router,
    extract::Path as AxumPath,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_embed::Embed;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

mod errors;
mod handlers;
pub mod session;
mod views;

pub use errors::AppError;
pub use session::CurrentUser;

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    /// bcrypt work factor applied to new registrations.
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: Database, bcrypt_cost: u32) -> Self {
        AppState {
            db: Arc::new(Mutex::new(db)),
            bcrypt_cost,
        }
    }

    /// Run `f` against the database on the blocking pool.
    ///
    /// The closure's own result is handed back untouched so callers can pick
    /// apart store errors (validation in particular) themselves.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Database) -> T + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || -> Result<T, AppError> {
            let guard = db
                .lock()
                .map_err(|_| AppError::Internal("database lock poisoned".to_string()))?;
            Ok(f(&guard))
        })
        .await
        .map_err(|e| AppError::Internal(format!("database task failed: {e}")))?
    }
}

/// Embedded static assets compiled into the binary.
#[derive(Embed)]
#[folder = "static/"]
struct StaticAssets;

/// Serve embedded static files at /static/{path}.
async fn static_handler(AxumPath(path): AxumPath<String>) -> Response {
    match StaticAssets::get(&path) {
        Some(content) => {
            let mime = if path.ends_with(".css") {
                "text/css"
            } else {
                "application/octet-stream"
            };
            ([(header::CONTENT_TYPE, mime)], content.data).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Build the axum router with all routes.
///
/// `/add`, `/update` and `/delete` are reachable without a session; only the
/// dashboard and logout require one.
pub fn create_router(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax);

    Router::new()
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route(
            "/dashboard",
            get(handlers::dashboard).post(handlers::dashboard),
        )
        .route("/add", post(handlers::add))
        .route("/update/{id}", get(handlers::update))
        .route("/delete/{id}", get(handlers::delete))
        .route("/logout", get(handlers::logout).post(handlers::logout))
        .route("/static/{*path}", get(static_handler))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Listener settings for `serve`.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub bcrypt_cost: u32,
}

/// Open the database, create the schema if needed and serve until Ctrl-C.
pub async fn serve(db_path: &Path, options: &ServeOptions) -> Result<()> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(Error::io("failed to create directory"))?;
    }
    let db = Database::open(db_path)?;
    db.migrate()?;

    let app = create_router(AppState::new(db, options.bcrypt_cost));
    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::io("failed to bind listener"))?;
    tracing::info!(db = %db_path.display(), "donelist listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::io("server error"))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
