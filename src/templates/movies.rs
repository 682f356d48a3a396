use maud::html;

use super::{
    FormAction, csrf_field, delete_form, external_link, file_field, general_errors, heading,
    image, page, scored_items, submit_row, text_field,
};
use crate::{
    entities::movie,
    forms::{FormErrors, MovieInput},
    models::{MovieDetail, MovieWithActors},
};

fn poster_src(movie: &movie::Model) -> Option<String> {
    movie.poster.as_ref().map(|_| format!("/movies/poster/{}", movie.id))
}

pub fn index_page(movies: &[MovieWithActors]) -> String {
    page(
        "Movies",
        html! {
            (heading("Movies", Some(("/movies/create", "New movie"))))
            @if movies.is_empty() {
                p class="mt-8 text-gray-600" { "No movies yet." }
            } @else {
                table class="mt-8 w-full bg-white shadow rounded-lg text-left text-sm" {
                    thead class="border-b text-gray-500" {
                        tr {
                            th class="p-3" { "Title" }
                            th class="p-3" { "Genre" }
                            th class="p-3" { "Year" }
                            th class="p-3" { "Cast" }
                            th class="p-3" { "Link" }
                            th class="p-3" {}
                        }
                    }
                    tbody {
                        @for entry in movies {
                            tr class="border-b last:border-0" {
                                td class="p-3 font-medium text-gray-900" { (entry.movie.title) }
                                td class="p-3" { (entry.movie.genre) }
                                td class="p-3" { (entry.movie.release_year) }
                                td class="p-3" {
                                    @for (i, actor) in entry.actors.iter().enumerate() {
                                        @if i > 0 { ", " }
                                        a class="text-blue-600 hover:text-blue-800" href=(format!("/actors/details/{}", actor.id)) { (actor.name) }
                                    }
                                }
                                td class="p-3" { (external_link(&entry.movie.imdb_url)) }
                                td class="p-3 whitespace-nowrap space-x-3" {
                                    a class="text-blue-600" href=(format!("/movies/details/{}", entry.movie.id)) { "Details" }
                                    a class="text-blue-600" href=(format!("/movies/edit/{}", entry.movie.id)) { "Edit" }
                                    a class="text-red-600" href=(format!("/movies/delete/{}", entry.movie.id)) { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_page(detail: &MovieDetail) -> String {
    let movie = &detail.movie.movie;
    page(
        &movie.title,
        html! {
            div class="bg-white shadow rounded-lg p-8 flex gap-8" {
                (image(poster_src(movie), &movie.title))
                div {
                    h1 class="text-3xl font-bold text-gray-900" {
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.release_year) ")" }
                    }
                    dl class="mt-4 grid grid-cols-2 gap-x-6 gap-y-2 text-sm" {
                        dt class="text-gray-500" { "Genre" } dd { (movie.genre) }
                        dt class="text-gray-500" { "IMDb" } dd { (external_link(&movie.imdb_url)) }
                    }
                    div class="mt-6" {
                        h2 class="text-sm font-semibold text-gray-700" { "Cast" }
                        @if detail.movie.actors.is_empty() {
                            p class="mt-1 text-sm text-gray-500" { "No actors linked yet." }
                        } @else {
                            ul class="mt-1 text-sm space-y-1" {
                                @for actor in &detail.movie.actors {
                                    li { a class="text-blue-600 hover:text-blue-800" href=(format!("/actors/details/{}", actor.id)) { (actor.name) } }
                                }
                            }
                        }
                    }
                    div class="mt-6 space-x-4 text-sm" {
                        a class="text-blue-600" href=(format!("/movies/edit/{}", movie.id)) { "Edit" }
                        a class="text-gray-600" href="/movies" { "Back to list" }
                    }
                }
            }
            (scored_items("Reviews", &detail.reviews, detail.average_sentiment, "No reviews could be generated right now."))
        },
    )
}

pub fn form_page(
    action: FormAction,
    input: &MovieInput,
    errors: &FormErrors,
    token: &str,
    has_poster: bool,
) -> String {
    let title = match action {
        FormAction::Create => "New movie",
        FormAction::Edit(_) => "Edit movie",
    };
    let poster_note = has_poster.then_some("Leave empty to keep the current poster.");
    page(
        title,
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900 mb-6" { (title) }
                (general_errors(errors))
                form class="space-y-6" method="post" enctype="multipart/form-data" action=(action.path("movies")) {
                    (csrf_field(token))
                    @if let FormAction::Edit(id) = action {
                        input type="hidden" name="id" value=(id);
                    }
                    (text_field("Title", "title", "text", &input.title, errors))
                    (text_field("IMDb link", "imdb_url", "url", &input.imdb_url, errors))
                    (text_field("Genre", "genre", "text", &input.genre, errors))
                    (text_field("Release year", "release_year", "number", &input.release_year, errors))
                    (file_field("Poster", "poster", poster_note))
                    (submit_row(action.verb(), "/movies"))
                }
            }
        },
    )
}

pub fn delete_page(movie: &movie::Model, token: &str) -> String {
    page(
        "Delete movie",
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Delete " (movie.title) "?" }
                p class="mt-2 text-gray-600" { "Every cast link to this movie is removed as well." }
                dl class="mt-4 grid grid-cols-2 gap-x-6 gap-y-2 text-sm" {
                    dt class="text-gray-500" { "Genre" } dd { (movie.genre) }
                    dt class="text-gray-500" { "Release year" } dd { (movie.release_year) }
                }
                (delete_form(&format!("/movies/delete/{}", movie.id), token, "/movies"))
            }
        },
    )
}
