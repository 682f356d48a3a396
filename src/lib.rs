pub mod annotation;
pub mod antiforgery;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod forms;
pub mod llm;
pub mod models;
pub mod routes;
pub mod sentiment;
pub mod templates;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::trace::TraceLayer;

use crate::{annotation::AnnotationService, catalog::Catalog};

pub struct AppState {
    pub catalog: Catalog,
    pub annotations: AnnotationService,
}

/// Builds the full application. `max_upload_bytes` caps every request body,
/// which bounds photo and poster uploads.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    use routes::{actor_movies, actors, movies};

    Router::new()
        .route("/", get(routes::home))
        .route("/actors", get(actors::index))
        .route("/actors/details/{id}", get(actors::details))
        .route("/actors/create", get(actors::create_form).post(actors::create))
        .route("/actors/edit/{id}", get(actors::edit_form).post(actors::edit))
        .route("/actors/delete/{id}", get(actors::delete_confirm).post(actors::delete))
        .route("/actors/photo/{id}", get(actors::photo))
        .route("/movies", get(movies::index))
        .route("/movies/details/{id}", get(movies::details))
        .route("/movies/create", get(movies::create_form).post(movies::create))
        .route("/movies/edit/{id}", get(movies::edit_form).post(movies::edit))
        .route("/movies/delete/{id}", get(movies::delete_confirm).post(movies::delete))
        .route("/movies/poster/{id}", get(movies::poster))
        .route("/actormovies", get(actor_movies::index))
        .route("/actormovies/details/{id}", get(actor_movies::details))
        .route("/actormovies/create", get(actor_movies::create_form).post(actor_movies::create))
        .route("/actormovies/edit/{id}", get(actor_movies::edit_form).post(actor_movies::edit))
        .route(
            "/actormovies/delete/{id}",
            get(actor_movies::delete_confirm).post(actor_movies::delete),
        )
        .fallback(routes::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
