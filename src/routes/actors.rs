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
    forms::{ActorInput, ConfirmInput, FormErrors, UploadForm},
    models::ActorDetail,
    templates::{FormAction, actors as views},
};

const PHOTO_FIELD: &str = "photo";

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let actors = state.catalog.actors_with_movies().await?;
    Ok(Html(views::index_page(&actors)))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id)?;
    let actor = state.catalog.actor_with_movies(id).await?.ok_or(AppError::NotFound)?;

    let tweets = state.annotations.tweets_for_actor(&actor.actor.name).await;
    let overall_sentiment = average_sentiment(&tweets);

    Ok(Html(views::detail_page(&ActorDetail { actor, tweets, overall_sentiment })))
}

pub async fn create_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, token) = antiforgery::issue(jar);
    let body = views::form_page(
        FormAction::Create,
        &ActorInput::default(),
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
    let form = UploadForm::read(multipart, PHOTO_FIELD).await?;
    antiforgery::verify(&jar, &form.text(antiforgery::FIELD_NAME))?;

    let input = ActorInput::from_upload(&form);
    match input.validate() {
        Ok(fields) => {
            state.catalog.create_actor(fields, form.file).await?;
            Ok(Redirect::to("/actors").into_response())
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
    let actor = state.catalog.find_actor(id).await?.ok_or(AppError::NotFound)?;

    let (jar, token) = antiforgery::issue(jar);
    let body = views::form_page(
        FormAction::Edit(id),
        &ActorInput::from_model(&actor),
        &FormErrors::default(),
        &token,
        actor.photo.is_some(),
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
    let form = UploadForm::read(multipart, PHOTO_FIELD).await?;
    antiforgery::verify(&jar, &form.text(antiforgery::FIELD_NAME))?;

    let input = ActorInput::from_upload(&form);
    ensure_same_id(id, &input.id)?;
    let existing = state.catalog.find_actor(id).await?.ok_or(AppError::NotFound)?;

    match input.validate() {
        Ok(fields) => {
            state.catalog.update_actor(id, fields, form.file).await?.ok_or(AppError::NotFound)?;
            Ok(Redirect::to("/actors").into_response())
        },
        Err(errors) => {
            Ok(rejected(jar, FormAction::Edit(id), &input, &errors, existing.photo.is_some()))
        },
    }
}

pub async fn delete_confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let id = parse_id(&id)?;
    let actor = state.catalog.find_actor(id).await?.ok_or(AppError::NotFound)?;

    let (jar, token) = antiforgery::issue(jar);
    Ok((jar, Html(views::delete_page(&actor, &token))))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(confirm): Form<ConfirmInput>,
) -> AppResult<Redirect> {
    let id = parse_id(&id)?;
    antiforgery::verify(&jar, &confirm.csrf)?;

    if !state.catalog.delete_actor(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Redirect::to("/actors"))
}

pub async fn photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let bytes = state.catalog.actor_photo(id).await?.ok_or(AppError::NotFound)?;
    Ok(image_response(bytes))
}

fn rejected(
    jar: CookieJar,
    action: FormAction,
    input: &ActorInput,
    errors: &FormErrors,
    has_photo: bool,
) -> Response {
    warn!(?action, errors = %errors.summary(), "actor form rejected");
    let (jar, token) = antiforgery::issue(jar);
    let body = views::form_page(action, input, errors, &token, has_photo);
    (StatusCode::UNPROCESSABLE_ENTITY, jar, Html(body)).into_response()
}
