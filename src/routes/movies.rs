use std::sync::Arc;

use axum::{
    extract::{Form, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use super::{ensure_same_id, image_response, parse_id};
use crate::{
    AppState, antiforgery,
    annotation::average_sentiment,
    error::{AppError, AppResult},
    forms::{ConfirmInput, FormErrors, MovieInput, UploadForm},
    models::MovieDetail,
    templates::{FormAction, movies as views},
};

const POSTER_FIELD: &str = "poster";

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let movies = state.catalog.movies_with_actors().await?;
    Ok(Html(views::index_page(&movies)))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id)?;
    let movie = state.catalog.movie_with_actors(id).await?.ok_or(AppError::NotFound)?;

    let reviews = state.annotations.reviews_for_movie(&movie.movie.title).await;
    let average_sentiment = average_sentiment(&reviews);

    Ok(Html(views::detail_page(&MovieDetail { movie, reviews, average_sentiment })))
}

pub async fn create_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, token) = antiforgery::issue(jar);
    let body = views::form_page(
        FormAction::Create,
        &MovieInput::default(),
        &FormErrors::default(),
        &token,
        false,
    );
    (jar, Html(body))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = UploadForm::read(multipart, POSTER_FIELD).await?;
    antiforgery::verify(&jar, &form.text(antiforgery::FIELD_NAME))?;

    let input = MovieInput::from_upload(&form);
    match input.validate() {
        Ok(fields) => {
            state.catalog.create_movie(fields, form.file).await?;
            Ok(Redirect::to("/movies").into_response())
        },
        Err(errors) => Ok(rejected(jar, FormAction::Create, &input, &errors, false)),
    }
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let id = parse_id(&id)?;
    let movie = state.catalog.find_movie(id).await?.ok_or(AppError::NotFound)?;

    let (jar, token) = antiforgery::issue(jar);
    let body = views::form_page(
        FormAction::Edit(id),
        &MovieInput::from_model(&movie),
        &FormErrors::default(),
        &token,
        movie.poster.is_some(),
    );
    Ok((jar, Html(body)))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    multipart: Multipart,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let form = UploadForm::read(multipart, POSTER_FIELD).await?;
    antiforgery::verify(&jar, &form.text(antiforgery::FIELD_NAME))?;

    let input = MovieInput::from_upload(&form);
    ensure_same_id(id, &input.id)?;
    let existing = state.catalog.find_movie(id).await?.ok_or(AppError::NotFound)?;

    match input.validate() {
        Ok(fields) => {
            state.catalog.update_movie(id, fields, form.file).await?.ok_or(AppError::NotFound)?;
            Ok(Redirect::to("/movies").into_response())
        },
        Err(errors) => {
            Ok(rejected(jar, FormAction::Edit(id), &input, &errors, existing.poster.is_some()))
        },
    }
}

pub async fn delete_confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let id = parse_id(&id)?;
    let movie = state.catalog.find_movie(id).await?.ok_or(AppError::NotFound)?;

    let (jar, token) = antiforgery::issue(jar);
    Ok((jar, Html(views::delete_page(&movie, &token))))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(confirm): Form<ConfirmInput>,
) -> AppResult<Redirect> {
    let id = parse_id(&id)?;
    antiforgery::verify(&jar, &confirm.csrf)?;

    if !state.catalog.delete_movie(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Redirect::to("/movies"))
}

pub async fn poster(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let bytes = state.catalog.movie_poster(id).await?.ok_or(AppError::NotFound)?;
    Ok(image_response(bytes))
}

fn rejected(
    jar: CookieJar,
    action: FormAction,
    input: &MovieInput,
    errors: &FormErrors,
    has_poster: bool,
) -> Response {
    warn!(?action, errors = %errors.summary(), "movie form rejected");
    let (jar, token) = antiforgery::issue(jar);
    let body = views::form_page(action, input, errors, &token, has_poster);
    (StatusCode::UNPROCESSABLE_ENTITY, jar, Html(body)).into_response()
}
