use axum::{
    http::header,
    response::{Html, IntoResponse, Response},
};

use crate::{
    error::{AppError, AppResult},
    templates,
};

pub mod actor_movies;
pub mod actors;
pub mod movies;

pub async fn home() -> Html<String> {
    Html(templates::home_page())
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Path identifiers that are not integers cannot name a row.
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}

/// Form ids must agree with the id in the path.
fn ensure_same_id(path_id: i32, form_id: &str) -> AppResult<()> {
    match form_id.trim().parse::<i32>() {
        Ok(id) if id == path_id => Ok(()),
        _ => Err(AppError::NotFound),
    }
}

fn image_response(bytes: Vec<u8>) -> Response {
    let mime = infer::get(&bytes).map(|kind| kind.mime_type()).unwrap_or("application/octet-stream");
    ([(header::CONTENT_TYPE, mime)], bytes).into_response()
}
