use maud::html;

use super::{
    FormAction, csrf_field, delete_form, external_link, file_field, general_errors, heading,
    image, page, scored_items, submit_row, text_field,
};
use crate::{
    entities::actor,
    forms::{ActorInput, FormErrors},
    models::{ActorDetail, ActorWithMovies},
};

fn photo_src(actor: &actor::Model) -> Option<String> {
    actor.photo.as_ref().map(|_| format!("/actors/photo/{}", actor.id))
}

pub fn index_page(actors: &[ActorWithMovies]) -> String {
    page(
        "Actors",
        html! {
            (heading("Actors", Some(("/actors/create", "New actor"))))
            @if actors.is_empty() {
                p class="mt-8 text-gray-600" { "No actors yet." }
            } @else {
                table class="mt-8 w-full bg-white shadow rounded-lg text-left text-sm" {
                    thead class="border-b text-gray-500" {
                        tr {
                            th class="p-3" { "Name" }
                            th class="p-3" { "Gender" }
                            th class="p-3" { "Age" }
                            th class="p-3" { "Movies" }
                            th class="p-3" { "Link" }
                            th class="p-3" {}
                        }
                    }
                    tbody {
                        @for entry in actors {
                            tr class="border-b last:border-0" {
                                td class="p-3 font-medium text-gray-900" { (entry.actor.name) }
                                td class="p-3" { (entry.actor.gender) }
                                td class="p-3" { (entry.actor.age) }
                                td class="p-3" {
                                    @for (i, movie) in entry.movies.iter().enumerate() {
                                        @if i > 0 { ", " }
                                        a class="text-blue-600 hover:text-blue-800" href=(format!("/movies/details/{}", movie.id)) { (movie.title) }
                                    }
                                }
                                td class="p-3" { (external_link(&entry.actor.imdb_url)) }
                                td class="p-3 whitespace-nowrap space-x-3" {
                                    a class="text-blue-600" href=(format!("/actors/details/{}", entry.actor.id)) { "Details" }
                                    a class="text-blue-600" href=(format!("/actors/edit/{}", entry.actor.id)) { "Edit" }
                                    a class="text-red-600" href=(format!("/actors/delete/{}", entry.actor.id)) { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn detail_page(detail: &ActorDetail) -> String {
    let actor = &detail.actor.actor;
    page(
        &actor.name,
        html! {
            div class="bg-white shadow rounded-lg p-8 flex gap-8" {
                (image(photo_src(actor), &actor.name))
                div {
                    h1 class="text-3xl font-bold text-gray-900" { (actor.name) }
                    dl class="mt-4 grid grid-cols-2 gap-x-6 gap-y-2 text-sm" {
                        dt class="text-gray-500" { "Gender" } dd { (actor.gender) }
                        dt class="text-gray-500" { "Age" } dd { (actor.age) }
                        dt class="text-gray-500" { "IMDb" } dd { (external_link(&actor.imdb_url)) }
                    }
                    div class="mt-6" {
                        h2 class="text-sm font-semibold text-gray-700" { "Movies" }
                        @if detail.actor.movies.is_empty() {
                            p class="mt-1 text-sm text-gray-500" { "Not linked to any movies." }
                        } @else {
                            ul class="mt-1 text-sm space-y-1" {
                                @for movie in &detail.actor.movies {
                                    li { a class="text-blue-600 hover:text-blue-800" href=(format!("/movies/details/{}", movie.id)) { (movie.title) } }
                                }
                            }
                        }
                    }
                    div class="mt-6 space-x-4 text-sm" {
                        a class="text-blue-600" href=(format!("/actors/edit/{}", actor.id)) { "Edit" }
                        a class="text-gray-600" href="/actors" { "Back to list" }
                    }
                }
            }
            (scored_items("Tweets", &detail.tweets, detail.overall_sentiment, "No tweets could be generated right now."))
        },
    )
}

pub fn form_page(
    action: FormAction,
    input: &ActorInput,
    errors: &FormErrors,
    token: &str,
    has_photo: bool,
) -> String {
    let title = match action {
        FormAction::Create => "New actor",
        FormAction::Edit(_) => "Edit actor",
    };
    let photo_note = has_photo.then_some("Leave empty to keep the current photo.");
    page(
        title,
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900 mb-6" { (title) }
                (general_errors(errors))
                form class="space-y-6" method="post" enctype="multipart/form-data" action=(action.path("actors")) {
                    (csrf_field(token))
                    @if let FormAction::Edit(id) = action {
                        input type="hidden" name="id" value=(id);
                    }
                    (text_field("Name", "name", "text", &input.name, errors))
                    (text_field("Gender", "gender", "text", &input.gender, errors))
                    (text_field("Age", "age", "number", &input.age, errors))
                    (text_field("IMDb link", "imdb_url", "url", &input.imdb_url, errors))
                    (file_field("Photo", "photo", photo_note))
                    (submit_row(action.verb(), "/actors"))
                }
            }
        },
    )
}

pub fn delete_page(actor: &actor::Model, token: &str) -> String {
    page(
        "Delete actor",
        html! {
            div class="max-w-2xl bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Delete " (actor.name) "?" }
                p class="mt-2 text-gray-600" { "This also removes the actor from every movie they are linked to." }
                dl class="mt-4 grid grid-cols-2 gap-x-6 gap-y-2 text-sm" {
                    dt class="text-gray-500" { "Gender" } dd { (actor.gender) }
                    dt class="text-gray-500" { "Age" } dd { (actor.age) }
                }
                (delete_form(&format!("/actors/delete/{}", actor.id), token, "/actors"))
            }
        },
    )
}
