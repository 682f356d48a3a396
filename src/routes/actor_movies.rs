use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use super::{ensure_same_id, parse_id};
use crate::{
    AppState, antiforgery,
    catalog::{Catalog, LinkWriteError},
    error::{AppError, AppResult},
    forms::{ConfirmInput, DUPLICATE_LINK, FormErrors, LINK_NOT_SAVED, LinkForm, LinkInput},
    templates::{FormAction, actor_movies as views},
};

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let links = state.catalog.links().await?;
    Ok(Html(views::index_page(&links)))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id)?;
    let entry = state.catalog.link_detail(id).await?.ok_or(AppError::NotFound)?;
    Ok(Html(views::detail_page(&entry)))
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let form = link_form(&state.catalog, LinkInput::default(), FormErrors::default()).await?;
    let (jar, token) = antiforgery::issue(jar);
    Ok((jar, Html(views::form_page(FormAction::Create, &form, &token))))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(input): Form<LinkInput>,
) -> AppResult<Response> {
    antiforgery::verify(&jar, &input.csrf)?;

    let (actor_id, movie_id) = match check_link(&state.catalog, &input, None).await? {
        Ok(pair) => pair,
        Err(errors) => return rejected(&state.catalog, jar, FormAction::Create, input, errors).await,
    };

    match state.catalog.create_link(actor_id, movie_id).await {
        Ok(_) => Ok(Redirect::to("/actormovies").into_response()),
        Err(err) => {
            let errors = write_failure(err)?;
            rejected(&state.catalog, jar, FormAction::Create, input, errors).await
        },
    }
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let id = parse_id(&id)?;
    let link = state.catalog.find_link(id).await?.ok_or(AppError::NotFound)?;

    let form =
        link_form(&state.catalog, LinkInput::from_model(&link), FormErrors::default()).await?;
    let (jar, token) = antiforgery::issue(jar);
    Ok((jar, Html(views::form_page(FormAction::Edit(id), &form, &token))))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(input): Form<LinkInput>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    antiforgery::verify(&jar, &input.csrf)?;
    ensure_same_id(id, &input.id)?;
    state.catalog.find_link(id).await?.ok_or(AppError::NotFound)?;

    let action = FormAction::Edit(id);
    let (actor_id, movie_id) = match check_link(&state.catalog, &input, Some(id)).await? {
        Ok(pair) => pair,
        Err(errors) => return rejected(&state.catalog, jar, action, input, errors).await,
    };

    match state.catalog.update_link(id, actor_id, movie_id).await {
        Ok(Some(_)) => Ok(Redirect::to("/actormovies").into_response()),
        Ok(None) => Err(AppError::NotFound),
        Err(err) => {
            let errors = write_failure(err)?;
            rejected(&state.catalog, jar, action, input, errors).await
        },
    }
}

pub async fn delete_confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let id = parse_id(&id)?;
    let entry = state.catalog.link_detail(id).await?.ok_or(AppError::NotFound)?;

    let (jar, token) = antiforgery::issue(jar);
    Ok((jar, Html(views::delete_page(&entry, &token))))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(confirm): Form<ConfirmInput>,
) -> AppResult<Redirect> {
    let id = parse_id(&id)?;
    antiforgery::verify(&jar, &confirm.csrf)?;

    if !state.catalog.delete_link(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Redirect::to("/actormovies"))
}

/// Runs every check that needs the database: both referents must exist and
/// no other link may already hold the pair.
async fn check_link(
    catalog: &Catalog,
    input: &LinkInput,
    excluding: Option<i32>,
) -> AppResult<Result<(i32, i32), FormErrors>> {
    let (actor_id, movie_id) = match input.validate() {
        Ok(pair) => pair,
        Err(errors) => return Ok(Err(errors)),
    };

    let mut errors = FormErrors::default();
    if !catalog.actor_exists(actor_id).await? {
        errors.add("actor_id", "Please select an actor.");
    }
    if !catalog.movie_exists(movie_id).await? {
        errors.add("movie_id", "Please select a movie.");
    }
    if errors.is_empty() && catalog.pair_exists(actor_id, movie_id, excluding).await? {
        errors.add_general(DUPLICATE_LINK);
    }

    Ok(if errors.is_empty() { Ok((actor_id, movie_id)) } else { Err(errors) })
}

/// Constraint violations that slipped past the pre-checks become form errors.
fn write_failure(err: LinkWriteError) -> AppResult<FormErrors> {
    let mut errors = FormErrors::default();
    match err {
        LinkWriteError::Duplicate => errors.add_general(DUPLICATE_LINK),
        LinkWriteError::MissingReferent => errors.add_general(LINK_NOT_SAVED),
        LinkWriteError::Db(err) => return Err(err.into()),
    }
    Ok(errors)
}

async fn link_form(catalog: &Catalog, input: LinkInput, errors: FormErrors) -> AppResult<LinkForm> {
    let (actors, movies) = futures::try_join!(catalog.actor_options(), catalog.movie_options())?;
    Ok(LinkForm { input, errors, actors, movies })
}

async fn rejected(
    catalog: &Catalog,
    jar: CookieJar,
    action: FormAction,
    input: LinkInput,
    errors: FormErrors,
) -> AppResult<Response> {
    warn!(?action, errors = %errors.summary(), "relationship form rejected");
    let form = link_form(catalog, input, errors).await?;
    let (jar, token) = antiforgery::issue(jar);
    Ok((StatusCode::UNPROCESSABLE_ENTITY, jar, Html(views::form_page(action, &form, &token)))
        .into_response())
}
