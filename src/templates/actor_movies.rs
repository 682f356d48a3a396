use maud::{Markup, html};

use super::{FormAction, csrf_field, delete_form, field_error, general_errors, heading, page, submit_row};
use crate::{
    forms::LinkForm,
    models::{LinkDetail, SelectOption},
};

pub fn index_page(links: &[LinkDetail]) -> String {
    page(
        "Cast links",
        html! {
            (heading("Cast links", Some(("/actormovies/create", "New link"))))
            @if links.is_empty() {
                p class="mt-8 text-gray-600" { "No actors are linked to movies yet." }
            } @else {
                table class="mt-8 w-full bg-white shadow rounded-lg text-left text-sm" {
                    thead class="border-b text-gray-500" {
                        tr {
                            th class="p-3" { "Actor" }
                            th class="p-3" { "Movie" }
                            th class="p-3" {}
                        }
                    }
                    tbody {
                        @for entry in links {
                            tr class="border-b last:border-0" {
                                td class="p-3" { (entry.actor.name) }
                                td class="p-3" { (entry.movie.title) }
                                td class="p-3 whitespace-nowrap space-x-3" {
                                    a class="text-blue-600" href=(format!("/actormovies/details/{}", entry.link.id)) { "Details" }
                                    a class="text-blue-600" href=(format!("/actormovies/edit/{}", entry.link.id)) { "Edit" }
                                    a class="text-red-600" href=(format!("/actormovies/delete/{}", entry.link.id)) { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_page(entry: &LinkDetail) -> String {
    page(
        "Cast link",
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Cast link" }
                (pairing(entry))
                div class="mt-6 space-x-4 text-sm" {
                    a class="text-blue-600" href=(format!("/actormovies/edit/{}", entry.link.id)) { "Edit" }
                    a class="text-gray-600" href="/actormovies" { "Back to list" }
                }
            }
        },
    )
}

pub fn form_page(action: FormAction, form: &LinkForm, token: &str) -> String {
    let title = match action {
        FormAction::Create => "New cast link",
        FormAction::Edit(_) => "Edit cast link",
    };
    page(
        title,
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900 mb-6" { (title) }
                (general_errors(&form.errors))
                form class="space-y-6" method="post" action=(action.path("actormovies")) {
                    (csrf_field(token))
                    @if let FormAction::Edit(id) = action {
                        input type="hidden" name="id" value=(id);
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="actor_id" { "Actor" }
                        (select("actor_id", "Select an actor", &form.actors, form.input.selected_actor()))
                        (field_error(&form.errors, "actor_id"))
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="movie_id" { "Movie" }
                        (select("movie_id", "Select a movie", &form.movies, form.input.selected_movie()))
                        (field_error(&form.errors, "movie_id"))
                    }
                    (submit_row(action.verb(), "/actormovies"))
                }
            }
        },
    )
}

pub fn delete_page(entry: &LinkDetail, token: &str) -> String {
    page(
        "Delete cast link",
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Delete this cast link?" }
                (pairing(entry))
                (delete_form(&format!("/actormovies/delete/{}", entry.link.id), token, "/actormovies"))
            }
        },
    )
}

fn pairing(entry: &LinkDetail) -> Markup {
    html! {
        dl class="mt-4 grid grid-cols-2 gap-x-6 gap-y-2 text-sm" {
            dt class="text-gray-500" { "Actor" }
            dd { a class="text-blue-600" href=(format!("/actors/details/{}", entry.actor.id)) { (entry.actor.name) } }
            dt class="text-gray-500" { "Movie" }
            dd { a class="text-blue-600" href=(format!("/movies/details/{}", entry.movie.id)) { (entry.movie.title) } }
        }
    }
}

fn select(name: &str, placeholder: &str, options: &[SelectOption], selected: Option<i32>) -> Markup {
    html! {
        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name=(name) id=(name) {
            option value="0" { (placeholder) }
            @for option in options {
                option value=(option.value) selected[selected == Some(option.value)] { (option.label) }
            }
        }
    }
}
