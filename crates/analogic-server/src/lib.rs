//! # Analogic Server
//!
//! HTTP backend for the ACT-R Analogic tutor.
//!
//! - `POST /api/buscar_recurso` - resolve a learning resource from context
//! - `POST /api/generar_analogia` - ask a language model for an analogy
//! - `POST /api/registrar_respuesta` - journal a student answer
//! - `POST /api/registrar_autoreporte` - score and journal a self-report
//! - `GET /admin/download_*` - download a journal with the admin key
//!
//! ```no_run
//! use analogic_core::table::{ReferenceTable, TableSchema};
//! use analogic_server::{app, journal::JournalPaths, state::AppState};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let table = ReferenceTable::load("data/rutas.csv", &TableSchema::default())?;
//! let state = AppState::new(table, &JournalPaths::in_dir("data"));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:10000").await?;
//! axum::serve(listener, app(state)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod journal;
pub mod prompt;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Build the router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
	Router::new()
		.route("/", get(routes::index))
		.route("/health", get(routes::health))
		.route("/api/buscar_recurso", post(routes::find_resource))
		.route("/api/registrar_respuesta", post(routes::record_answer))
		.route("/api/generar_analogia", post(routes::generate_analogy))
		.route("/api/registrar_autoreporte", post(routes::record_self_report))
		.route("/admin/download_respuestas", get(routes::download_responses))
		.route("/admin/download_analogias", get(routes::download_analogies))
		.route("/admin/download_autoreportes", get(routes::download_self_reports))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}
