//! Raw form input, validation and the data needed to re-render a rejected
//! form.
//!
//! Inputs keep every field as the submitted string so a failed submission can
//! be echoed back exactly as typed.

use std::collections::{BTreeMap, HashMap};

use axum::extract::Multipart;
use serde::Deserialize;

use crate::{
    entities::{actor, actor_movie, movie},
    error::AppResult,
    models::{ActorFields, MovieFields, SelectOption},
};

pub const DUPLICATE_LINK: &str = "This relationship already exists.";
pub const LINK_NOT_SAVED: &str = "Unable to save relationship. Ensure the selected actor and movie exist and the relationship is not duplicated.";

/// Field-level and form-level messages for a rejected submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
    general: Vec<String>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn add_general(&mut self, message: impl Into<String>) {
        self.general.push(message.into());
    }

    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn general(&self) -> &[String] {
        &self.general
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_empty()
    }

    /// All messages joined for logging.
    pub fn summary(&self) -> String {
        self.fields
            .values()
            .chain(self.general.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// A submitted multipart form: text fields plus an optional file part.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<Vec<u8>>,
}

impl UploadForm {
    /// Reads every part of the request. Only the part named `file_field`
    /// is kept as bytes; an empty file part counts as no upload.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.file = Some(bytes.to_vec());
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActorInput {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub age: String,
    pub imdb_url: String,
}

impl ActorInput {
    pub fn from_upload(form: &UploadForm) -> Self {
        Self {
            id: form.text("id"),
            name: form.text("name"),
            gender: form.text("gender"),
            age: form.text("age"),
            imdb_url: form.text("imdb_url"),
        }
    }

    pub fn from_model(actor: &actor::Model) -> Self {
        Self {
            id: actor.id.to_string(),
            name: actor.name.clone(),
            gender: actor.gender.clone(),
            age: actor.age.to_string(),
            imdb_url: actor.imdb_url.clone(),
        }
    }

    pub fn validate(&self) -> Result<ActorFields, FormErrors> {
        let mut errors = FormErrors::default();
        let name = required_text(&mut errors, "name", "Name", &self.name, 100);
        let gender = optional_text(&mut errors, "gender", "Gender", &self.gender, 20);
        let age = whole_number(&mut errors, "age", "Age", &self.age);
        let imdb_url = web_url(&mut errors, "imdb_url", &self.imdb_url);
        errors.into_result(|| ActorFields { name, gender, age, imdb_url })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieInput {
    pub id: String,
    pub title: String,
    pub imdb_url: String,
    pub genre: String,
    pub release_year: String,
}

impl MovieInput {
    pub fn from_upload(form: &UploadForm) -> Self {
        Self {
            id: form.text("id"),
            title: form.text("title"),
            imdb_url: form.text("imdb_url"),
            genre: form.text("genre"),
            release_year: form.text("release_year"),
        }
    }

    pub fn from_model(movie: &movie::Model) -> Self {
        Self {
            id: movie.id.to_string(),
            title: movie.title.clone(),
            imdb_url: movie.imdb_url.clone(),
            genre: movie.genre.clone(),
            release_year: movie.release_year.to_string(),
        }
    }

    pub fn validate(&self) -> Result<MovieFields, FormErrors> {
        let mut errors = FormErrors::default();
        let title = required_text(&mut errors, "title", "Title", &self.title, 100);
        let imdb_url = web_url(&mut errors, "imdb_url", &self.imdb_url);
        let genre = optional_text(&mut errors, "genre", "Genre", &self.genre, 50);
        let release_year =
            whole_number(&mut errors, "release_year", "Release year", &self.release_year);
        errors.into_result(|| MovieFields { title, imdb_url, genre, release_year })
    }
}

/// Submitted actor/movie pairing. Selector values stay strings until
/// validated so an unparseable choice can still be echoed back.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LinkInput {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub actor_id: String,
    #[serde(default)]
    pub movie_id: String,
    #[serde(default, rename = "_csrf")]
    pub csrf: String,
}

impl LinkInput {
    pub fn from_model(link: &actor_movie::Model) -> Self {
        Self {
            id: link.id.to_string(),
            actor_id: link.actor_id.to_string(),
            movie_id: link.movie_id.to_string(),
            csrf: String::new(),
        }
    }

    /// Checks both selectors hold a positive id. Existence and uniqueness
    /// need the database and are checked by the caller.
    pub fn validate(&self) -> Result<(i32, i32), FormErrors> {
        let mut errors = FormErrors::default();
        let actor_id = selector(&mut errors, "actor_id", "Please select an actor.", &self.actor_id);
        let movie_id = selector(&mut errors, "movie_id", "Please select a movie.", &self.movie_id);
        errors.into_result(|| (actor_id, movie_id))
    }

    pub fn selected_actor(&self) -> Option<i32> {
        self.actor_id.trim().parse().ok()
    }

    pub fn selected_movie(&self) -> Option<i32> {
        self.movie_id.trim().parse().ok()
    }
}

/// Everything the relationship form needs to render.
#[derive(Clone, Debug, Default)]
pub struct LinkForm {
    pub input: LinkInput,
    pub errors: FormErrors,
    pub actors: Vec<SelectOption>,
    pub movies: Vec<SelectOption>,
}

/// Body of the delete confirmation forms.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmInput {
    #[serde(default, rename = "_csrf")]
    pub csrf: String,
}

fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{label} is required."));
    } else {
        check_length(errors, field, label, value, max);
    }
    value.to_string()
}

fn optional_text(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) -> String {
    let value = value.trim();
    check_length(errors, field, label, value, max);
    value.to_string()
}

fn check_length(errors: &mut FormErrors, field: &'static str, label: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("{label} must be at most {max} characters."));
    }
}

fn whole_number(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> i32 {
    match value.trim().parse::<i32>() {
        Ok(n) if n < 0 => {
            errors.add(field, format!("{label} cannot be negative."));
            n
        },
        Ok(n) => n,
        Err(_) => {
            errors.add(field, format!("{label} must be a whole number."));
            0
        },
    }
}

fn web_url(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {},
        _ => errors.add(field, "IMDb link must be a valid http(s) URL."),
    }
    value.to_string()
}

fn selector(errors: &mut FormErrors, field: &'static str, message: &str, value: &str) -> i32 {
    match value.trim().parse::<i32>() {
        Ok(id) if id >= 1 => id,
        _ => {
            errors.add(field, message);
            0
        },
    }
}
